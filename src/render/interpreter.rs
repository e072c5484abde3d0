use std::sync::Arc;

use crate::assets::graphics::{CellGraphics, GraphicsCache};
use crate::board::state::BoardState;
use crate::config::settings::RenderSettings;
use crate::foundation::core::{PixelRect, Player, Point};
use crate::foundation::error::GobanResult;
use crate::record::coords::{
    decode_labels, decode_lines, decode_point, decode_points, is_pass, parse_move_number,
};
use crate::record::model::{Command, CommandCode, RecordNode};
use crate::render::layers::{AnnotationKind, LayerCompositor};

/// Arrow heads are this many line widths long.
const ARROW_HEAD_LENGTH: f32 = 3.0;
/// Arrow heads are this many line widths wide on each side of the shaft.
const ARROW_HEAD_HALF_WIDTH: f32 = 1.6;

/// What a turn node produced besides its layer mutations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct NodeOutcome {
    /// A move instruction in the node was a pass.
    pub(crate) passed: bool,
    /// Cell whose freshly drawn move number must be hidden again by a transient frame.
    pub(crate) transient: Option<Point>,
}

enum Step {
    Done,
    Pass,
    Numbered(Point),
}

/// Walks record nodes, mutating the board and the layers.
///
/// Node 0 is applied by [`CommandInterpreter::apply_setup`]; every later node by
/// [`CommandInterpreter::apply_turn`].
pub(crate) struct CommandInterpreter<'a> {
    settings: &'a RenderSettings,
    graphics: &'a GraphicsCache,
    cells: Arc<CellGraphics>,
    board: BoardState,
    layers: LayerCompositor,
    move_number: u32,
}

impl<'a> CommandInterpreter<'a> {
    pub(crate) fn new(
        settings: &'a RenderSettings,
        graphics: &'a GraphicsCache,
        cells: Arc<CellGraphics>,
        board: BoardState,
        layers: LayerCompositor,
    ) -> Self {
        Self {
            settings,
            graphics,
            cells,
            board,
            layers,
            move_number: 0,
        }
    }

    pub(crate) fn board(&self) -> &BoardState {
        &self.board
    }

    pub(crate) fn layers(&self) -> &LayerCompositor {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut LayerCompositor {
        &mut self.layers
    }

    pub(crate) fn move_number(&self) -> u32 {
        self.move_number
    }

    /// Apply the setup node. Numbering starts at 1 afterwards whatever the node contained.
    pub(crate) fn apply_setup(&mut self, node: &RecordNode) -> GobanResult<()> {
        for cmd in &node.commands {
            self.execute(cmd)?;
        }
        self.move_number = 1;
        Ok(())
    }

    /// Apply one turn node. A move-number override takes effect before anything else in the node.
    pub(crate) fn apply_turn(&mut self, node: &RecordNode) -> GobanResult<NodeOutcome> {
        let override_at = node
            .commands
            .iter()
            .position(|c| c.code == CommandCode::MoveNumber);
        if let Some(value) = override_at.and_then(|i| node.commands[i].params.first()) {
            self.move_number = parse_move_number(value)?;
        }

        let mut outcome = NodeOutcome::default();
        for (i, cmd) in node.commands.iter().enumerate() {
            if Some(i) == override_at {
                continue;
            }
            match self.execute(cmd)? {
                Step::Done => {}
                Step::Pass => outcome.passed = true,
                Step::Numbered(p) => outcome.transient = Some(p),
            }
        }
        Ok(outcome)
    }

    fn execute(&mut self, cmd: &Command) -> GobanResult<Step> {
        match &cmd.code {
            CommandCode::AddBlack => self.place_setup(&cmd.params, Player::Black),
            CommandCode::AddWhite => self.place_setup(&cmd.params, Player::White),
            CommandCode::AddEmpty => {
                let points = decode_points(&cmd.params);
                for &p in &points {
                    self.board.clear(p);
                }
                self.layers.clear(&points);
            }
            CommandCode::Black => return self.play(&cmd.params, Player::Black),
            CommandCode::White => return self.play(&cmd.params, Player::White),
            CommandCode::Label => self.draw_labels(&cmd.params)?,
            CommandCode::Line => self.draw_strokes(&cmd.params, false)?,
            CommandCode::Arrow => self.draw_strokes(&cmd.params, true)?,
            code => {
                if let Some(kind) = code.marker() {
                    let points = decode_points(&cmd.params);
                    let annotation = AnnotationKind::Marker(kind);
                    if points.is_empty() && kind.clears_when_empty() {
                        self.layers.clear_kind(&annotation);
                    } else {
                        let board = &self.board;
                        self.layers.paste_annotation(
                            &annotation,
                            &points,
                            self.cells.marker(kind),
                            |q| board.get(q).is_some(),
                        );
                    }
                }
            }
        }
        Ok(Step::Done)
    }

    fn place_setup(&mut self, params: &[String], player: Player) {
        let points = decode_points(params);
        for &p in &points {
            self.board.place_initial(p, player);
        }
        self.layers.paste_stone(&points, self.cells.stone(player));
    }

    fn play(&mut self, params: &[String], player: Player) -> GobanResult<Step> {
        let size = (self.board.width(), self.board.height());
        let Some(raw) = params.first().filter(|v| !is_pass(v.as_str(), size)) else {
            return Ok(Step::Pass);
        };
        let number = self.move_number;
        self.move_number = self.move_number.saturating_add(1);
        let Some(p) = decode_point(raw) else {
            tracing::debug!(value = %raw, "malformed move coordinate ignored");
            return Ok(Step::Done);
        };

        let result = self.board.attempt_move(p, player);
        if !result.accepted {
            tracing::debug!(point = %p, ?player, number, "move rejected");
            return Ok(Step::Done);
        }

        let captured: Vec<Point> = result.captured.into_iter().collect();
        if self.settings.render_captures {
            self.layers.clear(&captured);
            if captured.contains(&p) {
                return Ok(Step::Done);
            }
        }
        self.layers.paste_stone(&[p], self.cells.stone(player));

        if !self.settings.show_stone_numbers {
            return Ok(Step::Done);
        }
        let kind = AnnotationKind::MoveNumber(player);
        let board = &self.board;
        if self.settings.marker_instead_of_numbers {
            self.layers.paste_annotation(
                &kind,
                &[p],
                self.cells.placement_marker(),
                |q| board.get(q).is_some(),
            );
        } else {
            let style = &self.settings.style;
            let color = match player {
                Player::Black => style.number_color_for_black,
                Player::White => style.number_color_for_white,
            };
            let text = number.to_string();
            let scale = self.settings.number_text_scale
                + (text.len() as f32 - 1.0) * self.settings.digit_text_scale_factor;
            let graphic = self
                .graphics
                .text(style, &text, color, scale, self.cells.size())?;
            self.layers
                .paste_annotation(&kind, &[p], &graphic, |q| board.get(q).is_some());
        }

        Ok(if self.settings.maintain_stone_numbers {
            Step::Done
        } else {
            Step::Numbered(p)
        })
    }

    fn draw_labels(&mut self, params: &[String]) -> GobanResult<()> {
        let style = &self.settings.style;
        for (p, text) in decode_labels(params) {
            let color = match self.board.get(p) {
                Some(Player::Black) => style.number_color_for_black,
                Some(Player::White) => style.number_color_for_white,
                None => style.label_color,
            };
            let graphic = self.graphics.text(
                style,
                &text,
                color,
                self.settings.label_text_scale,
                self.cells.size(),
            )?;
            let board = &self.board;
            self.layers.paste_annotation(
                &AnnotationKind::Label(text),
                &[p],
                &graphic,
                |q| board.get(q).is_some(),
            );
        }
        Ok(())
    }

    /// Lines get round caps. Orthogonal lines are pulled in by one pixel at each end so that
    /// lines meeting at a shared endpoint join without a bulge.
    fn draw_strokes(&mut self, params: &[String], arrow: bool) -> GobanResult<()> {
        let vp = *self.layers.viewport();
        let (img_w, img_h) = vp.image_size();
        let width = self.settings.annotate_line_width(vp.cell_size) as f32;
        let color = self.settings.style.annotate_line_color.to_hex();

        for (from, to) in decode_lines(params) {
            if from == to {
                continue;
            }
            let (mut ax, mut ay) = vp.center_px(from);
            let (mut bx, mut by) = vp.center_px(to);
            if ay == by {
                let d = (bx - ax).signum();
                ax += d;
                bx -= d;
            } else if ax == bx {
                let d = (by - ay).signum();
                ay += d;
                by -= d;
            }

            let mut body = String::new();
            let reach = if arrow {
                let len = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt().max(1.0);
                let (ux, uy) = ((bx - ax) / len, (by - ay) / len);
                let head = width * ARROW_HEAD_LENGTH;
                let half = width * ARROW_HEAD_HALF_WIDTH;
                let (hx, hy) = (bx - ux * head, by - uy * head);
                body.push_str(&format!(
                    r#"<path d="M{bx} {by} L{} {} L{} {} Z" fill="{color}"/>"#,
                    hx - uy * half,
                    hy + ux * half,
                    hx + uy * half,
                    hy - ux * half,
                ));
                // stop the shaft inside the head so the tip stays sharp
                bx -= ux * head * 0.8;
                by -= uy * head * 0.8;
                head
            } else {
                width
            };
            body.insert_str(
                0,
                &format!(
                    r#"<line x1="{ax}" y1="{ay}" x2="{bx}" y2="{by}" stroke="{color}" stroke-width="{width}" stroke-linecap="round"/>"#
                ),
            );

            let pad = reach + 2.0;
            let clamp = |v: f32, hi: u32| v.clamp(0.0, hi as f32) as u32;
            let region = PixelRect {
                x0: clamp(ax.min(bx).min(vp.center_px(to).0) - pad, img_w),
                y0: clamp(ay.min(by).min(vp.center_px(to).1) - pad, img_h),
                x1: clamp(ax.max(bx).max(vp.center_px(to).0) + pad + 1.0, img_w),
                y1: clamp(ay.max(by).max(vp.center_px(to).1) + pad + 1.0, img_h),
            };
            if region.width() == 0 || region.height() == 0 {
                tracing::debug!(%from, %to, "line outside the image ignored");
                continue;
            }
            let overlay = self.graphics.rasterize_overlay(&body, region)?;
            self.layers
                .draw_on_lines(&overlay, i64::from(region.x0), i64::from(region.y0));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/interpreter.rs"]
mod tests;
