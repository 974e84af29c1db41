//! Engine launch configuration

use std::path::PathBuf;
use std::time::Duration;

/// How to launch and talk to the engine process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Engine executable
    pub path: PathBuf,
    /// Extra command line arguments (`-u` puts gnuchess into UCI mode)
    pub args: Vec<String>,
    /// `setoption` pairs sent once after `uciok`, in order
    pub options: Vec<(String, String)>,
    /// Upper bound for each handshake step (`uciok`, `readyok`)
    pub handshake_timeout: Duration,
    /// Extra time granted on top of the search budget before a request fails
    pub reply_grace: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/usr/bin/gnuchess"),
            args: vec!["-u".to_string()],
            options: vec![("BookFile".to_string(), "smallbook.bin".to_string())],
            handshake_timeout: Duration::from_secs(10),
            reply_grace: Duration::from_secs(5),
        }
    }
}
