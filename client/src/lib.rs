//! # Snake Game Client Library
//!
//! This library provides the complete client-side implementation for the
//! multiplayer snake game. It handles input capture, the message channel to
//! the server, local game state prediction, and rendering.
//!
//! ## Architecture Overview
//!
//! The client is designed around a predictive architecture that keeps local
//! movement responsive despite network latency: the local snake is simulated
//! immediately, one tile per tick, while every other player is drawn strictly
//! from the latest authoritative server snapshot.
//!
//! ### Local Prediction
//! The client owns a predicted copy of its own snake and advances it every
//! tick without waiting for server confirmation, including predicted food
//! consumption and local food regeneration.
//!
//! ### Reconciliation
//! Authoritative snapshots replace the remote view wholesale. Before each
//! render the predicted local snake is overlaid on that view under the local
//! player key, so local prediction always wins for the local id and server
//! truth wins for every other id.
//!
//! ### Terminal Collisions
//! Wall, self, and cross-snake collisions are first-class events, not
//! errors. Any of them (or a server collision notice) ends the session; after
//! a fixed grace delay the client rebuilds the session from scratch.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! Client-side game state management:
//! - Local snake prediction and food consumption
//! - Remote state store with wholesale snapshot replacement
//! - The merge composing one frame for the render sink
//!
//! ### Input Module (`input`)
//! Arrow-key capture and heading validation:
//! - Key-to-heading mapping, all other keys ignored
//! - Reversal rejection so the snake can never fold onto its own neck
//!
//! ### Network Module (`network`)
//! The message channel adapter and session loop:
//! - WebSocket connection and the one-time state-request handshake
//! - Presence-driven dispatch of optional inbound fields
//! - The fixed-period tick driving simulate/merge/render/send
//!
//! ### Rendering Module (`rendering`)
//! The render sink: background, snakes as filled tiles, the food tile, and
//! one score line per player in stable key order.
//!
//! ### Sound Module (`sound`)
//! Fire-and-forget playback triggers for collision and food pickup; a
//! missing asset or failed playback is logged and never fatal.

pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
pub mod sound;
