use std::os::unix::fs::{FileTypeExt, MetadataExt, PermissionsExt};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::IpcStream;

/// Well-known rendezvous path for the snapshot channel.
///
/// The producer binds here and the consumer connects here; neither side
/// negotiates the location at runtime.
pub const DEFAULT_CHANNEL_PATH: &str = "/tmp/reflscope.sock";

/// Permission mode applied to the bound socket path.
const SOCKET_MODE: u32 = 0o600;

/// Unix `sockaddr_un.sun_path` is typically 108 bytes on Linux, 104 on macOS.
#[cfg(target_os = "linux")]
const MAX_PATH_LEN: usize = 108;
#[cfg(not(target_os = "linux"))]
const MAX_PATH_LEN: usize = 104;

/// The well-known local channel, producer side.
///
/// Binds a filesystem-path Unix domain socket and accepts one consumer
/// connection at a time. Stale socket files are removed before binding (only
/// if the existing path is a socket), and the bound path is removed on drop
/// only while its (dev, inode) identity still matches what `bind` created.
pub struct UnixChannel {
    listener: UnixListener,
    path: PathBuf,
    created_inode: Option<(u64, u64)>,
}

impl UnixChannel {
    /// Bind and listen on the channel path.
    pub fn bind(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let path_bytes = path.as_os_str().len();
        if path_bytes >= MAX_PATH_LEN {
            return Err(TransportError::PathTooLong {
                path,
                len: path_bytes,
                max: MAX_PATH_LEN,
            });
        }

        remove_stale_socket(&path)?;

        let listener = UnixListener::bind(&path).map_err(|e| TransportError::Bind {
            path: path.clone(),
            source: e,
        })?;

        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(SOCKET_MODE)).map_err(
            |e| TransportError::Bind {
                path: path.clone(),
                source: e,
            },
        )?;

        let created = std::fs::symlink_metadata(&path).map_err(|e| TransportError::Bind {
            path: path.clone(),
            source: e,
        })?;

        info!(?path, "snapshot channel bound");

        Ok(Self {
            listener,
            path,
            created_inode: Some((created.dev(), created.ino())),
        })
    }

    /// Accept a consumer connection (blocking).
    pub fn accept(&self) -> Result<IpcStream> {
        let (stream, _addr) = self.listener.accept().map_err(TransportError::Accept)?;
        debug!("consumer connected");
        Ok(IpcStream::from_unix(stream))
    }

    /// Connect to the channel as the consumer (blocking).
    ///
    /// The returned stream is effectively read-only: its write half is shut
    /// down before it is handed out, since the snapshot protocol is
    /// one-directional.
    pub fn connect(path: impl AsRef<Path>) -> Result<IpcStream> {
        let path = path.as_ref();
        let stream =
            std::os::unix::net::UnixStream::connect(path).map_err(|e| TransportError::Connect {
                path: path.to_path_buf(),
                source: e,
            })?;
        let stream = IpcStream::from_unix(stream);
        stream.shutdown_write()?;
        debug!(?path, "connected to snapshot channel");
        Ok(stream)
    }

    /// The path this channel is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Remove an existing socket file at `path`, refusing to touch anything that
/// is not a socket.
fn remove_stale_socket(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let metadata = std::fs::symlink_metadata(path).map_err(|e| TransportError::Bind {
        path: path.to_path_buf(),
        source: e,
    })?;
    if !metadata.file_type().is_socket() {
        return Err(TransportError::Bind {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "existing path is not a unix socket",
            ),
        });
    }
    debug!(?path, "removing stale socket");
    std::fs::remove_file(path).map_err(|e| TransportError::Bind {
        path: path.to_path_buf(),
        source: e,
    })
}

impl Drop for UnixChannel {
    fn drop(&mut self) {
        let Some((expected_dev, expected_ino)) = self.created_inode else {
            return;
        };
        if let Ok(metadata) = std::fs::symlink_metadata(&self.path) {
            if metadata.file_type().is_socket()
                && metadata.dev() == expected_dev
                && metadata.ino() == expected_ino
            {
                debug!(path = ?self.path, "cleaning up socket file");
                let _ = std::fs::remove_file(&self.path);
            } else {
                debug!(
                    path = ?self.path,
                    "socket path identity changed; skipping cleanup"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    fn unique_temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("reflscope-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
        dir
    }

    #[test]
    fn bind_accept_connect() {
        let dir = unique_temp_dir("uds-roundtrip");
        let sock_path = dir.join("channel.sock");

        let channel = UnixChannel::bind(&sock_path).unwrap();
        assert!(sock_path.exists());

        let path_clone = sock_path.clone();
        let consumer = std::thread::spawn(move || {
            let mut stream = UnixChannel::connect(&path_clone).unwrap();
            let mut buf = [0u8; 5];
            stream.read_exact(&mut buf).unwrap();
            buf
        });

        let mut producer = channel.accept().unwrap();
        producer.write_all(b"hello").unwrap();
        drop(producer);

        assert_eq!(&consumer.join().unwrap(), b"hello");

        drop(channel);
        assert!(
            !sock_path.exists(),
            "socket file should be cleaned up on drop"
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn consumer_write_half_is_shut_down() {
        let dir = unique_temp_dir("uds-readonly");
        let sock_path = dir.join("channel.sock");
        let channel = UnixChannel::bind(&sock_path).unwrap();

        let path_clone = sock_path.clone();
        let consumer =
            std::thread::spawn(move || UnixChannel::connect(&path_clone).unwrap());
        let _producer = channel.accept().unwrap();
        let mut stream = consumer.join().unwrap();

        let result = stream.write(b"x");
        assert!(
            matches!(result, Err(_) | Ok(0)),
            "write on a shut-down half should not succeed"
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn path_too_long() {
        let long_path = "/tmp/".to_string() + &"a".repeat(200) + ".sock";
        let result = UnixChannel::bind(&long_path);
        assert!(matches!(result, Err(TransportError::PathTooLong { .. })));
    }

    #[test]
    fn bind_hardens_socket_permissions() {
        let dir = unique_temp_dir("uds-perms");
        let sock_path = dir.join("channel.sock");

        let channel = UnixChannel::bind(&sock_path).unwrap();
        let mode = std::fs::metadata(&sock_path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);

        drop(channel);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn bind_rejects_existing_non_socket_file() {
        let dir = unique_temp_dir("uds-nonsock");
        let sock_path = dir.join("not-a-socket.sock");
        std::fs::write(&sock_path, b"regular-file").unwrap();

        let result = UnixChannel::bind(&sock_path);
        assert!(matches!(result, Err(TransportError::Bind { .. })));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn drop_does_not_remove_replaced_path() {
        let dir = unique_temp_dir("uds-drop-race");
        let sock_path = dir.join("channel.sock");

        let channel = UnixChannel::bind(&sock_path).unwrap();
        assert!(sock_path.exists());

        // Replace path while the channel is alive.
        std::fs::remove_file(&sock_path).unwrap();
        std::fs::write(&sock_path, b"replacement-file").unwrap();

        drop(channel);
        assert!(
            sock_path.exists(),
            "drop must not remove path if inode identity changed"
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn connect_without_producer_fails() {
        let dir = unique_temp_dir("uds-noproducer");
        let sock_path = dir.join("missing.sock");
        let result = UnixChannel::connect(&sock_path);
        assert!(matches!(result, Err(TransportError::Connect { .. })));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
