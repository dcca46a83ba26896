use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use padlink_core::{HeldKeys, Invite, Key, KeyboardSampler, Launch, UnknownKey};
use padlink_peer::{
    ControlToggle, GuestNegotiator, GuestSender, HostNegotiator, HostReceiver, HttpSignalingClient,
    HttpSignalingConfig, InputSampler, PadSource, PollPolicy, TransportConfig, TransportEvent,
    VirtualPad, WebRtcTransport,
};
use padlink_signaling::{RoomStore, StoreConfig, spawn_expiry_task};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

#[derive(Parser)]
#[command(name = "padlink", version, about = "Peer-to-peer remote play sessions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct TransportArgs {
    /// STUN servers, comma separated. Pass an empty value for host candidates only.
    #[arg(
        long,
        env = "PADLINK_STUN",
        value_delimiter = ',',
        default_value = "stun:stun.l.google.com:19302,stun:stun1.l.google.com:19302"
    )]
    stun: Vec<String>,

    /// Give up waiting for the other side after this many seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl TransportArgs {
    fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            ice_servers: self.stun.iter().filter(|s| !s.is_empty()).cloned().collect(),
            ..TransportConfig::default()
        }
    }

    fn poll_policy(&self) -> PollPolicy {
        match self.timeout_secs {
            Some(secs) => PollPolicy::default().with_timeout(Duration::from_secs(secs)),
            None => PollPolicy::default(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling room store.
    Serve {
        #[arg(long, env = "PADLINK_BIND", default_value = "0.0.0.0:8787")]
        bind: SocketAddr,

        #[arg(long, env = "PADLINK_ROOM_TTL_SECONDS", default_value_t = 900)]
        ttl_seconds: u64,
    },

    /// Open a room and wait for a guest.
    Host {
        #[arg(long, env = "PADLINK_SIGNALING_URL", default_value = "http://127.0.0.1:8787")]
        signaling_url: Url,

        /// Page the invite link points at. Defaults to the signaling url.
        #[arg(long)]
        invite_base: Option<Url>,

        #[command(flatten)]
        transport: TransportArgs,
    },

    /// Join a room from an invite link.
    Join {
        invite: String,

        /// Signaling origin. Defaults to the origin of the invite link.
        #[arg(long, env = "PADLINK_SIGNALING_URL")]
        signaling_url: Option<Url>,

        /// Read key events from stdin: `+KeyD` presses, `-KeyD` releases, `toggle` flips control.
        #[arg(long)]
        keys_stdin: bool,

        /// Start with control enabled.
        #[arg(long)]
        control: bool,

        /// Never read a physical gamepad.
        #[arg(long)]
        no_gamepad: bool,

        #[command(flatten)]
        transport: TransportArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            "padlink_cli=info,padlink_peer=info,padlink_signaling=info".into()
        })))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match Cli::parse().command {
        Commands::Serve { bind, ttl_seconds } => serve(bind, ttl_seconds).await,
        Commands::Host {
            signaling_url,
            invite_base,
            transport,
        } => host(signaling_url, invite_base, transport).await,
        Commands::Join {
            invite,
            signaling_url,
            keys_stdin,
            control,
            no_gamepad,
            transport,
        } => join(&invite, signaling_url, keys_stdin, control, no_gamepad, transport).await,
    }
}

async fn serve(bind: SocketAddr, ttl_seconds: u64) -> Result<()> {
    let config = StoreConfig::default().with_room_ttl(Duration::from_secs(ttl_seconds));
    let store = Arc::new(RoomStore::new(config));
    spawn_expiry_task(&store);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;

    println!("{}", format!("📡 Signaling on http://{bind}").green().bold());
    padlink_signaling::serve(listener, store)
        .await
        .context("Signaling server stopped")
}

async fn host(signaling_url: Url, invite_base: Option<Url>, args: TransportArgs) -> Result<()> {
    let signaling = HttpSignalingClient::new(HttpSignalingConfig::new(signaling_url.clone()))?;
    let (events_tx, mut events_rx) = mpsc::channel(256);
    let transport = WebRtcTransport::new(args.transport_config(), events_tx).await?;

    let negotiator = HostNegotiator::new(
        Arc::new(signaling),
        Arc::new(transport),
        invite_base.unwrap_or(signaling_url),
    )
    .with_poll_policy(args.poll_policy());

    let mut invite_rx = negotiator.invite();
    tokio::spawn(async move {
        if let Ok(invite) = invite_rx.wait_for(Option::is_some).await
            && let Some(invite) = invite.as_ref()
        {
            println!("{}", "🔗 Invite link:".cyan().bold());
            println!("   {}", invite.to_url());
        }
    });

    let session = match negotiator.run().await {
        Ok(session) => session,
        Err(e) => bail!("{}", e.status_message()),
    };
    println!(
        "{}",
        format!("✨ Guest connected to room {}", session.credentials.room_id)
            .green()
            .bold()
    );

    let mut receiver = HostReceiver::new(VirtualPad::new());
    let stats = receiver.run(&mut events_rx).await;

    println!(
        "Session ended: {} applied, {} malformed, {} unknown, {} field failures",
        stats.applied, stats.malformed, stats.unknown_tag, stats.field_failures
    );
    Ok(())
}

async fn join(
    raw_invite: &str,
    signaling_url: Option<Url>,
    keys_stdin: bool,
    control: bool,
    no_gamepad: bool,
    args: TransportArgs,
) -> Result<()> {
    let url = Url::parse(raw_invite.trim()).context("Invite is not a url")?;
    let invite: Invite = match Launch::from_url(&url)? {
        Launch::Join(invite) => invite,
        Launch::Host => bail!("Not an invite link (missing p2p=join)"),
    };

    let signaling_url = match signaling_url {
        Some(url) => url,
        None => invite.origin_url()?,
    };
    let signaling = HttpSignalingClient::new(HttpSignalingConfig::new(signaling_url))?;
    let (events_tx, events_rx) = mpsc::channel(256);
    let transport = Arc::new(WebRtcTransport::new(args.transport_config(), events_tx).await?);

    let negotiator = GuestNegotiator::new(Arc::new(signaling), transport.clone(), invite)
        .with_poll_policy(args.poll_policy());

    println!("{}", "⏳ Waiting for the host's offer...".cyan());
    if let Err(e) = negotiator.run().await {
        bail!("{}", e.status_message());
    }
    println!("{}", "✨ Answer published, connecting".green().bold());

    tokio::spawn(log_guest_events(events_rx));

    let held = HeldKeys::new();
    let toggle = ControlToggle::new(control);
    if keys_stdin {
        tokio::spawn(read_keys(held.clone(), toggle.clone()));
    }

    let input = InputSampler::new(controller(no_gamepad), KeyboardSampler::new(held));
    let sender = GuestSender::new(transport, input, toggle);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    let stats = sender.run(shutdown_rx).await;
    println!(
        "Session ended: {} sent, {} send failures",
        stats.sent, stats.send_failures
    );
    Ok(())
}

#[cfg(feature = "gamepad")]
fn controller(disabled: bool) -> Arc<dyn PadSource> {
    if disabled {
        return Arc::new(padlink_peer::NoController);
    }
    Arc::new(padlink_peer::GilrsPadSource::spawn())
}

#[cfg(not(feature = "gamepad"))]
fn controller(_disabled: bool) -> Arc<dyn PadSource> {
    Arc::new(padlink_peer::NoController)
}

async fn log_guest_events(mut events: mpsc::Receiver<TransportEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            TransportEvent::Connected => println!("{}", "🎮 Connected to host".green().bold()),
            TransportEvent::Interrupted => println!("{}", "Connection interrupted, retrying".yellow()),
            TransportEvent::Disconnected => println!("{}", "Host disconnected".yellow()),
            TransportEvent::RemoteTrack(track) => info!("Receiving media track {}", track.id()),
            other => debug!("{:?}", other),
        }
    }
}

/// Stdin stands in for a window's key events on a headless guest.
async fn read_keys(held: HeldKeys, toggle: ControlToggle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        let result = match line {
            "" => continue,
            "toggle" => {
                let enabled = toggle.toggle();
                println!("Control {}", if enabled { "enabled" } else { "disabled" });
                Ok(())
            }
            "release" => {
                held.release_all();
                Ok(())
            }
            _ => {
                if let Some(key) = line.strip_prefix('+') {
                    key.parse::<Key>().map(|k| held.press(k))
                } else if let Some(key) = line.strip_prefix('-') {
                    key.parse::<Key>().map(|k| held.release(k))
                } else {
                    Err(UnknownKey(line.to_owned()))
                }
            }
        };

        if let Err(e) = result {
            warn!("{}", e);
        }
    }
}
