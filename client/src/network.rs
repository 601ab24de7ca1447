use crate::game::{ClientGameState, ServerEvent, TickEvent};
use crate::input::DirectionController;
use crate::rendering::Renderer;
use crate::sound::{SoundBank, SoundKind};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{ClientMessage, Grid, ServerUpdate, LOCAL_PLAYER_ID};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{interval, sleep};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsSource = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// How long the terminal frame stays on screen before the session resets.
const GRACE_DELAY: Duration = Duration::from_secs(2);
/// Arrow keys are sampled more often than the simulation ticks so a press
/// landing between frames is not lost.
const INPUT_POLL_PERIOD: Duration = Duration::from_millis(16);

pub struct Client {
    sink: WsSink,
    source: WsSource,
    connected: bool,

    game_state: ClientGameState,
    controller: DirectionController,
    renderer: Renderer,
    sounds: SoundBank,
    rng: StdRng,

    tick_period: Duration,
}

impl Client {
    pub async fn new(
        server_url: &str,
        tick_ms: u64,
        width: u32,
        height: u32,
        tile_size: u32,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let grid = Grid::from_canvas(width, height, tile_size)
            .ok_or("canvas and tile size must yield a grid with positive dimensions")?;
        if !grid.has_interior() {
            return Err("grid must be at least 3x3 tiles so food can spawn".into());
        }

        let (ws, _) = connect_async(server_url).await?;
        info!("Channel open to {}", server_url);
        let (sink, source) = ws.split();

        let renderer = Renderer::new(width, height, tile_size)?;
        let sounds = SoundBank::load().await;

        Ok(Client {
            sink,
            source,
            connected: true,
            game_state: ClientGameState::new(grid),
            controller: DirectionController::default(),
            renderer,
            sounds,
            rng: StdRng::from_entropy(),
            tick_period: Duration::from_millis(tick_ms),
        })
    }

    /// One-time handshake: ask for the current snapshot so the first render
    /// has authoritative state to merge with.
    async fn connect(&mut self) {
        info!("Requesting initial state...");
        self.send_message(&ClientMessage::RequestState).await;
    }

    /// Fire-and-forget send. A closed channel drops the message with a
    /// warning; it never fails the tick.
    async fn send_message(&mut self, message: &ClientMessage) {
        if !self.connected {
            warn!("channel not open, dropping outbound message");
            return;
        }

        match serde_json::to_string(message) {
            Ok(json) => {
                if let Err(e) = self.sink.send(Message::Text(json.into())).await {
                    warn!("channel send failed, dropping outbound message: {}", e);
                    self.connected = false;
                }
            }
            Err(e) => warn!("failed to encode outbound message: {}", e),
        }
    }

    /// Dispatches one inbound frame. Returns true when the message carried a
    /// collision notice, i.e. the session is over.
    fn handle_server_text(&mut self, text: &str) -> bool {
        let update: ServerUpdate = match serde_json::from_str(text) {
            Ok(update) => update,
            Err(e) => {
                warn!("malformed server message ignored: {}", e);
                return false;
            }
        };

        let mut terminal = false;
        for event in self.game_state.apply_server_update(update) {
            match event {
                ServerEvent::Collision => {
                    self.sounds.play(SoundKind::Collision);
                    terminal = true;
                }
                ServerEvent::FoodEaten => self.sounds.play(SoundKind::FoodEaten),
                ServerEvent::SnapshotReplaced => {
                    // A fresh snapshot repaints immediately rather than
                    // waiting out the rest of the tick period.
                    let snapshot = self.game_state.merged_snapshot(self.controller.current());
                    self.renderer.render(&snapshot);
                }
                ServerEvent::ScoresReplaced => {}
            }
        }
        terminal
    }

    /// One frame, in order: advance the prediction, merge, render, emit the
    /// current heading. Returns true when the session hit a collision.
    async fn handle_tick(&mut self) -> bool {
        let heading = self.controller.current();
        let event = self.game_state.tick(heading, &mut self.rng);

        let mut terminal = false;
        match event {
            TickEvent::Moved => {}
            TickEvent::FoodEaten => {
                self.sounds.play(SoundKind::FoodEaten);
                self.send_message(&ClientMessage::FoodEaten {
                    player_id: LOCAL_PLAYER_ID.to_string(),
                })
                .await;
            }
            TickEvent::Collision(kind) => {
                info!("Collision ({:?}), session over", kind);
                self.sounds.play(SoundKind::Collision);
                terminal = true;
            }
        }

        let snapshot = self.game_state.merged_snapshot(heading);
        self.renderer.render(&snapshot);
        self.send_message(&ClientMessage::Play { direction: heading })
            .await;

        terminal
    }

    /// Drives the session until a collision ends it: one select loop over
    /// inbound frames, the input poll, and the fixed-period game tick.
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.connect().await;

        let mut input_interval = interval(INPUT_POLL_PERIOD);
        let mut game_interval = interval(self.tick_period);

        loop {
            tokio::select! {
                frame = self.source.next(), if self.connected => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            if self.handle_server_text(&text) {
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            warn!("channel closed by server, future sends will be dropped");
                            self.connected = false;
                        }
                        // Ping/pong/binary frames are not part of the protocol.
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            warn!("channel error: {}, future sends will be dropped", e);
                            self.connected = false;
                        }
                    }
                }

                _ = input_interval.tick() => {
                    self.controller.poll();
                }

                _ = game_interval.tick() => {
                    if self.handle_tick().await {
                        break;
                    }
                }
            }
        }

        // Breaking out of the loop is the single cancellation point for the
        // tick timer; nothing advances during the grace delay.
        sleep(GRACE_DELAY).await;
        info!("Grace delay elapsed, session reset");

        Ok(())
    }
}
