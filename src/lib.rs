//! goban-anim renders Go game records into a static diagram and a minimal animated GIF.
//!
//! # Pipeline overview
//!
//! 1. **Parse**: record text -> `Vec<RecordNode>` ([`parse_sgf`], main line only)
//! 2. **Plan**: nodes -> [`Viewport`] (visible window, margin, cell size)
//! 3. **Interpret**: each node mutates a [`BoardState`] and the stacked drawing layers
//! 4. **Assemble**: composed frames -> timed frames ([`AnimationAssembler`])
//! 5. **Encode** (optional): [`write_static_png`] / [`write_animated_gif`]
//!
//! The entry points are [`render_static`] and [`render_animated`]. Both take the settings and a
//! [`GraphicsCache`] explicitly; nothing is configured through global state. A render owns its
//! board and layers exclusively, so independent records may be rendered in parallel against
//! one shared cache.
//!
//! Records with nothing worth drawing yield [`RenderOutcome::Skipped`], and illegal moves are
//! reported through [`MoveResult`]; neither is an error.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod board;
mod config;
mod encode;
mod foundation;
mod layout;
mod record;
mod render;

pub use assets::graphics::{CellGraphics, GraphicsCache};
pub use board::state::{BoardState, MoveResult};
pub use config::settings::{RenderSettings, Style, StyleKey, TimingConfig};
pub use encode::raster::{ensure_parent_dir, write_animated_gif, write_static_png};
pub use foundation::core::{PixelRect, Player, Point, Rgb8};
pub use foundation::error::{GobanError, GobanResult};
pub use layout::viewport::{Viewport, ViewportInputs, plan_viewport, points_of_interest};
pub use record::coords::{
    MAX_BOARD_SIDE, decode_labels, decode_lines, decode_point, decode_points, parse_board_size,
    parse_move_number,
};
pub use record::model::{Command, CommandCode, MarkerKind, RecordNode};
pub use record::parse::{parse_sgf, read_record};
pub use render::animation::{AnimationAssembler, Frame, TimedFrame};
pub use render::board_image::star_points;
pub use render::layers::AnnotationKind;
pub use render::pipeline::{RenderOutcome, SkipReason, render_animated, render_static};
