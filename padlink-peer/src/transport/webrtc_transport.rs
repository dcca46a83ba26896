use crate::transport::session_transport::{
    ChannelState, ControlChannel, DescriptionKind, SessionTransport,
};
use crate::transport::transport_config::TransportConfig;
use crate::transport::transport_event::TransportEvent;
use async_trait::async_trait;
use padlink_core::{SessionDescription, TransportError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::{MIME_TYPE_H264, MediaEngine};
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_init::RTCDataChannelInit;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::data_channel::data_channel_state::RTCDataChannelState;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

fn transport_err(context: &str, e: impl std::fmt::Display) -> TransportError {
    TransportError::new(format!("{context}: {e}"))
}

/// JSON form of a description, the same shape browsers produce from `RTCSessionDescription`.
#[derive(Serialize, Deserialize)]
struct WireDescription {
    #[serde(rename = "type")]
    kind: String,
    sdp: String,
}

/// webrtc-rs implementation of [`SessionTransport`].
///
/// Callbacks push [`TransportEvent`]s into `event_tx`; the host drains them in its receive loop.
pub struct WebRtcTransport {
    peer_connection: Arc<RTCPeerConnection>,
    config: TransportConfig,
    event_tx: mpsc::Sender<TransportEvent>,
    control: Arc<Mutex<Option<Arc<RTCDataChannel>>>>,
    video_track: Mutex<Option<Arc<TrackLocalStaticSample>>>,
    gathering: Mutex<Option<mpsc::Receiver<()>>>,
}

impl WebRtcTransport {
    pub async fn new(
        config: TransportConfig,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Self, TransportError> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()
            .map_err(|e| transport_err("register codecs", e))?;
        let registry = register_default_interceptors(Registry::new(), &mut m)
            .map_err(|e| transport_err("register interceptors", e))?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let ice_servers = if config.ice_servers.is_empty() {
            vec![]
        } else {
            vec![RTCIceServer {
                urls: config.ice_servers.clone(),
                ..Default::default()
            }]
        };

        let rtc_config = RTCConfiguration {
            ice_servers,
            ..Default::default()
        };

        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .map_err(|e| transport_err("create peer connection", e))?,
        );

        let control: Arc<Mutex<Option<Arc<RTCDataChannel>>>> = Arc::new(Mutex::new(None));

        let state_tx = event_tx.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();

                Box::pin(async move {
                    info!("Peer connection state changed: {:?}", s);
                    let event = match s {
                        RTCPeerConnectionState::Connected => TransportEvent::Connected,
                        RTCPeerConnectionState::Disconnected => TransportEvent::Interrupted,
                        RTCPeerConnectionState::Failed | RTCPeerConnectionState::Closed => {
                            TransportEvent::Disconnected
                        }
                        _ => return,
                    };
                    let _ = tx.send(event).await;
                })
            },
        ));

        // The guest never creates the channel; it arrives with the host's offer.
        let dc_tx = event_tx.clone();
        let dc_slot = Arc::clone(&control);
        peer_connection.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let tx = dc_tx.clone();
            let slot = Arc::clone(&dc_slot);

            Box::pin(async move {
                debug!("Remote announced data channel '{}'", dc.label());
                wire_channel(&dc, tx);
                *slot.lock().await = Some(dc);
            })
        }));

        let track_tx = event_tx.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();
                Box::pin(async move {
                    info!("Remote {} track {}", track.kind(), track.id());
                    let _ = tx.send(TransportEvent::RemoteTrack(track)).await;
                })
            },
        ));

        Ok(Self {
            peer_connection,
            config,
            event_tx,
            control,
            video_track: Mutex::new(None),
            gathering: Mutex::new(None),
        })
    }

    pub fn peer_connection(&self) -> &Arc<RTCPeerConnection> {
        &self.peer_connection
    }

    /// Outbound video track, once `attach_media` ran. The host application writes encoded frames here.
    pub async fn video_track(&self) -> Option<Arc<TrackLocalStaticSample>> {
        self.video_track.lock().await.clone()
    }

    // Arm the gathering notification before the local description is set so completion can't be missed.
    async fn arm_gathering(&self) {
        let done = self.peer_connection.gathering_complete_promise().await;
        *self.gathering.lock().await = Some(done);
    }

    async fn set_local(&self, desc: RTCSessionDescription) -> Result<(), TransportError> {
        self.arm_gathering().await;
        self.peer_connection
            .set_local_description(desc)
            .await
            .map_err(|e| transport_err("set local description", e))
    }
}

/// Forward channel lifecycle and inbound messages as transport events.
fn wire_channel(dc: &Arc<RTCDataChannel>, event_tx: mpsc::Sender<TransportEvent>) {
    let tx_open = event_tx.clone();
    let label = dc.label().to_owned();
    dc.on_open(Box::new(move || {
        let tx = tx_open.clone();
        Box::pin(async move {
            info!("Control channel '{}' open", label);
            let _ = tx.send(TransportEvent::ControlChannelOpen(label)).await;
        })
    }));

    let tx_close = event_tx.clone();
    dc.on_close(Box::new(move || {
        let tx = tx_close.clone();
        Box::pin(async move {
            info!("Control channel closed");
            let _ = tx.send(TransportEvent::ControlChannelClosed).await;
        })
    }));

    let tx_msg = event_tx;
    dc.on_message(Box::new(move |msg: DataChannelMessage| {
        let tx = tx_msg.clone();
        Box::pin(async move {
            let _ = tx.send(TransportEvent::Message(msg.data)).await;
        })
    }));
}

#[async_trait]
impl ControlChannel for RTCDataChannel {
    fn label(&self) -> String {
        RTCDataChannel::label(self).to_owned()
    }

    fn state(&self) -> ChannelState {
        match self.ready_state() {
            RTCDataChannelState::Open => ChannelState::Open,
            RTCDataChannelState::Closing => ChannelState::Closing,
            RTCDataChannelState::Closed => ChannelState::Closed,
            _ => ChannelState::Connecting,
        }
    }

    async fn send_text(&self, text: String) -> Result<(), TransportError> {
        RTCDataChannel::send_text(self, text)
            .await
            .map(|_| ())
            .map_err(|e| transport_err("send", e))
    }
}

#[async_trait]
impl SessionTransport for WebRtcTransport {
    async fn attach_media(&self) -> Result<(), TransportError> {
        let track = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_H264.to_owned(),
                ..Default::default()
            },
            "video".to_owned(),
            "padlink".to_owned(),
        ));

        let sender = self
            .peer_connection
            .add_track(Arc::clone(&track) as Arc<dyn TrackLocal + Send + Sync>)
            .await
            .map_err(|e| transport_err("add video track", e))?;

        // RTCP has to be drained for the interceptors to keep working.
        tokio::spawn(async move {
            let mut buf = vec![0u8; 1500];
            while sender.read(&mut buf).await.is_ok() {}
        });

        *self.video_track.lock().await = Some(track);
        Ok(())
    }

    async fn create_control_channel(&self) -> Result<Arc<dyn ControlChannel>, TransportError> {
        let init = RTCDataChannelInit {
            ordered: Some(true),
            ..Default::default()
        };

        let dc = self
            .peer_connection
            .create_data_channel(&self.config.control_label, Some(init))
            .await
            .map_err(|e| transport_err("create data channel", e))?;

        wire_channel(&dc, self.event_tx.clone());
        *self.control.lock().await = Some(Arc::clone(&dc));

        Ok(dc)
    }

    async fn create_offer(&self) -> Result<(), TransportError> {
        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .map_err(|e| transport_err("create offer", e))?;
        self.set_local(offer).await
    }

    async fn create_answer(&self) -> Result<(), TransportError> {
        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .map_err(|e| transport_err("create answer", e))?;
        self.set_local(answer).await
    }

    async fn set_remote_description(
        &self,
        kind: DescriptionKind,
        description: &SessionDescription,
    ) -> Result<(), TransportError> {
        // Accept the JSON form and, for peers that publish it, bare SDP.
        let sdp = match serde_json::from_str::<WireDescription>(description.as_str()) {
            Ok(wire) if wire.kind == kind.to_string() => wire.sdp,
            Ok(wire) => {
                return Err(TransportError::new(format!(
                    "expected {kind} description, got {}",
                    wire.kind
                )));
            }
            Err(_) => description.as_str().to_owned(),
        };

        let desc = match kind {
            DescriptionKind::Offer => RTCSessionDescription::offer(sdp),
            DescriptionKind::Answer => RTCSessionDescription::answer(sdp),
        }
        .map_err(|e| transport_err("parse remote description", e))?;

        self.peer_connection
            .set_remote_description(desc)
            .await
            .map_err(|e| transport_err("set remote description", e))
    }

    async fn wait_gathering_complete(&self) -> Result<(), TransportError> {
        let armed = self.gathering.lock().await.take();
        let mut done = match armed {
            Some(rx) => rx,
            None => self.peer_connection.gathering_complete_promise().await,
        };

        // Resolves on completion; the sender is dropped if gathering already finished.
        let _ = done.recv().await;

        let state = self.peer_connection.ice_gathering_state();
        debug!("Candidate gathering finished ({:?})", state);
        Ok(())
    }

    async fn local_description(&self) -> Result<SessionDescription, TransportError> {
        let desc = self
            .peer_connection
            .local_description()
            .await
            .ok_or_else(|| TransportError::new("no local description"))?;

        let wire = WireDescription {
            kind: desc.sdp_type.to_string(),
            sdp: desc.sdp,
        };
        serde_json::to_string(&wire)
            .map(SessionDescription::from)
            .map_err(|e| transport_err("serialize local description", e))
    }

    async fn control_channel(&self) -> Option<Arc<dyn ControlChannel>> {
        self.control
            .lock()
            .await
            .clone()
            .map(|dc| dc as Arc<dyn ControlChannel>)
    }

    async fn close(&self) -> Result<(), TransportError> {
        if let Err(e) = self.peer_connection.close().await {
            warn!("Failed to close peer connection: {}", e);
            return Err(transport_err("close", e));
        }
        Ok(())
    }
}

