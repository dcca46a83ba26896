/// Configuration for the WebRTC transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// STUN/TURN urls. Empty means host candidates only (loopback tests, LAN).
    pub ice_servers: Vec<String>,
    /// Label of the control data channel created by the host.
    pub control_label: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![
                "stun:stun.l.google.com:19302".to_owned(),
                "stun:stun1.l.google.com:19302".to_owned(),
            ],
            control_label: "input".to_owned(),
        }
    }
}
