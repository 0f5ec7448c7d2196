//! Fake memcached speaking the ASCII protocol, served by tokio on a
//! background thread. Handles the commands the memcache client issues.

use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone)]
pub struct Stored {
    pub flags: u32,
    pub exptime: u32,
    pub data: Vec<u8>,
}

pub type Items = Arc<Mutex<HashMap<String, Stored>>>;

pub struct FakeMemcached {
    pub port: u16,
    pub items: Items,
}

impl FakeMemcached {
    /// Binds an ephemeral port and serves until the test process exits.
    pub fn start() -> anyhow::Result<Self> {
        let items: Items = Arc::default();
        let (tx, rx) = mpsc::channel();

        let served = items.clone();
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("runtime");
            runtime.block_on(async move {
                let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
                tx.send(listener.local_addr().expect("addr").port())
                    .expect("send port");
                loop {
                    let Ok((socket, _)) = listener.accept().await else {
                        break;
                    };
                    let items = served.clone();
                    tokio::spawn(async move {
                        let _ = serve(socket, items).await;
                    });
                }
            });
        });

        let port = rx.recv()?;
        Ok(Self { port, items })
    }

    pub fn stored(&self, key: &str) -> Option<Stored> {
        self.items.lock().unwrap().get(key).cloned()
    }
}

async fn serve(socket: TcpStream, items: Items) -> anyhow::Result<()> {
    let mut io = BufReader::new(socket);
    let mut line = String::new();

    loop {
        line.clear();
        if io.read_line(&mut line).await? == 0 {
            return Ok(());
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(command) = parts.first() else {
            continue;
        };

        let reply = match *command {
            "get" | "gets" => {
                let mut out = Vec::new();
                let items = items.lock().unwrap();
                for key in &parts[1..] {
                    if let Some(item) = items.get(*key) {
                        let header = if *command == "gets" {
                            format!("VALUE {} {} {} 1\r\n", key, item.flags, item.data.len())
                        } else {
                            format!("VALUE {} {} {}\r\n", key, item.flags, item.data.len())
                        };
                        out.extend_from_slice(header.as_bytes());
                        out.extend_from_slice(&item.data);
                        out.extend_from_slice(b"\r\n");
                    }
                }
                out.extend_from_slice(b"END\r\n");
                out
            }
            "set" => {
                // set <key> <flags> <exptime> <bytes> [noreply]
                let key = parts[1].to_string();
                let flags = parts[2].parse()?;
                let exptime = parts[3].parse()?;
                let len: usize = parts[4].parse()?;
                let noreply = parts.get(5) == Some(&"noreply");

                let mut data = vec![0; len + 2];
                io.read_exact(&mut data).await?;
                data.truncate(len);

                items.lock().unwrap().insert(
                    key,
                    Stored {
                        flags,
                        exptime,
                        data,
                    },
                );
                if noreply {
                    Vec::new()
                } else {
                    b"STORED\r\n".to_vec()
                }
            }
            "delete" => {
                if items.lock().unwrap().remove(parts[1]).is_some() {
                    b"DELETED\r\n".to_vec()
                } else {
                    b"NOT_FOUND\r\n".to_vec()
                }
            }
            "stats" => {
                let count = items.lock().unwrap().len();
                format!("STAT pid 1\r\nSTAT curr_items {}\r\nEND\r\n", count).into_bytes()
            }
            "version" => b"VERSION 1.6.0\r\n".to_vec(),
            "flush_all" => {
                items.lock().unwrap().clear();
                b"OK\r\n".to_vec()
            }
            "quit" => return Ok(()),
            _ => b"ERROR\r\n".to_vec(),
        };

        let socket = io.get_mut();
        socket.write_all(&reply).await?;
        socket.flush().await?;
    }
}
