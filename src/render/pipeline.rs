use image::{DynamicImage, RgbImage};

use crate::assets::graphics::GraphicsCache;
use crate::board::state::BoardState;
use crate::config::settings::{RenderSettings, TimingConfig};
use crate::foundation::core::{PixelRect, Player};
use crate::foundation::error::GobanResult;
use crate::layout::viewport::{ViewportInputs, plan_viewport};
use crate::record::coords::parse_board_size;
use crate::record::model::{CommandCode, RecordNode};
use crate::render::animation::{AnimationAssembler, Frame, TimedFrame};
use crate::render::board_image::draw_board_background;
use crate::render::interpreter::CommandInterpreter;
use crate::render::layers::{AnnotationKind, LayerCompositor};

/// Result of a render call that may legitimately have nothing to draw.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderOutcome<T> {
    /// The record was rendered.
    Rendered(T),
    /// The record has nothing worth rendering.
    Skipped(SkipReason),
}

impl<T> RenderOutcome<T> {
    /// The rendered value, if any.
    pub fn rendered(self) -> Option<T> {
        match self {
            Self::Rendered(v) => Some(v),
            Self::Skipped(_) => None,
        }
    }
}

/// Why a record was not rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer than two nodes: no setup plus turn.
    TooFewNodes,
    /// A single turn holding only annotations, which does not need an animation.
    AnnotationOnly,
    /// The setup node declares no board size.
    MissingBoardSize,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::TooFewNodes => "record has fewer than two nodes",
            Self::AnnotationOnly => "single annotation-only turn",
            Self::MissingBoardSize => "setup node has no board size",
        })
    }
}

/// Render the final position of `nodes` as one RGB image.
#[tracing::instrument(skip_all, fields(nodes = nodes.len()))]
pub fn render_static(
    nodes: &[RecordNode],
    inputs: ViewportInputs,
    settings: &RenderSettings,
    graphics: &GraphicsCache,
) -> GobanResult<RenderOutcome<RgbImage>> {
    let mut interp = match prepare(nodes, inputs, settings, graphics, false)? {
        RenderOutcome::Rendered(interp) => interp,
        RenderOutcome::Skipped(reason) => return Ok(RenderOutcome::Skipped(reason)),
    };
    for node in &nodes[1..] {
        interp.apply_turn(node)?;
    }
    log_final_state(&interp);
    let image = DynamicImage::ImageRgba8(interp.layers().compose()).to_rgb8();
    Ok(RenderOutcome::Rendered(image))
}

/// Render `nodes` as a timed frame sequence, one persistent frame per turn.
#[tracing::instrument(skip_all, fields(nodes = nodes.len()))]
pub fn render_animated(
    nodes: &[RecordNode],
    inputs: ViewportInputs,
    settings: &RenderSettings,
    timing: TimingConfig,
    graphics: &GraphicsCache,
) -> GobanResult<RenderOutcome<Vec<TimedFrame>>> {
    let mut interp = match prepare(nodes, inputs, settings, graphics, true)? {
        RenderOutcome::Rendered(interp) => interp,
        RenderOutcome::Skipped(reason) => return Ok(RenderOutcome::Skipped(reason)),
    };

    let first = interp.layers().compose();
    let (w, h) = first.dimensions();
    interp.layers_mut().take_dirty();
    let mut frames = vec![Frame {
        image: first,
        transient: false,
        dirty: Some(PixelRect {
            x0: 0,
            y0: 0,
            x1: w,
            y1: h,
        }),
    }];

    for node in &nodes[1..] {
        let outcome = interp.apply_turn(node)?;
        if outcome.passed && settings.maintain_numbers_at_end {
            continue;
        }
        let layers = interp.layers_mut();
        let dirty = layers.take_dirty();
        frames.push(Frame {
            image: layers.compose(),
            transient: false,
            dirty,
        });

        let Some(p) = outcome.transient else {
            continue;
        };
        // a later command in the same node may already have replaced the number
        if matches!(layers.annotation_at(p), Some(AnnotationKind::MoveNumber(_))) {
            layers.clear_annotations(&[p]);
            let dirty = layers.take_dirty();
            frames.push(Frame {
                image: layers.compose(),
                transient: true,
                dirty,
            });
        }
    }
    log_final_state(&interp);

    let timed = AnimationAssembler::new(timing, settings).assemble(frames)?;
    Ok(RenderOutcome::Rendered(timed))
}

/// Shared setup: skip checks, viewport, graphics, background, and the setup node.
fn prepare<'a>(
    nodes: &[RecordNode],
    inputs: ViewportInputs,
    settings: &'a RenderSettings,
    graphics: &'a GraphicsCache,
    animated: bool,
) -> GobanResult<RenderOutcome<CommandInterpreter<'a>>> {
    if nodes.len() < 2 {
        return Ok(skip(SkipReason::TooFewNodes));
    }
    if animated && nodes.len() == 2 && nodes[1].is_annotation_only() {
        return Ok(skip(SkipReason::AnnotationOnly));
    }
    let size_param = nodes[0]
        .commands
        .iter()
        .find(|c| c.code == CommandCode::Size)
        .and_then(|c| c.params.first());
    let Some(size_param) = size_param else {
        return Ok(skip(SkipReason::MissingBoardSize));
    };
    let (board_w, board_h) = parse_board_size(size_param)?;

    let vp = plan_viewport(nodes, (board_w, board_h), settings, inputs)?;
    let cells = graphics.get_or_build(&settings.style, vp.draw_cell_size)?;
    let background = draw_board_background(&vp, &settings.style, cells.star_point());
    let layers = LayerCompositor::new(vp, background, settings.label_text_scale);
    let board = BoardState::new(board_w, board_h).with_self_capture(settings.allow_self_capture);

    let mut interp = CommandInterpreter::new(settings, graphics, cells, board, layers);
    interp.apply_setup(&nodes[0])?;
    Ok(RenderOutcome::Rendered(interp))
}

fn skip<T>(reason: SkipReason) -> RenderOutcome<T> {
    tracing::info!(%reason, "nothing to render");
    RenderOutcome::Skipped(reason)
}

fn log_final_state(interp: &CommandInterpreter<'_>) {
    tracing::debug!(
        next_move = interp.move_number(),
        stones = interp.board().stone_count(Player::Black)
            + interp.board().stone_count(Player::White),
        "record interpreted"
    );
}
