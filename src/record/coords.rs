use crate::foundation::core::Point;
use crate::foundation::error::{GobanError, GobanResult};
use crate::record::model::{Command, CommandCode};

/// Largest board side expressible with `a..zA..Z` coordinates.
pub const MAX_BOARD_SIDE: u32 = 52;

/// Boards up to this side may still write a pass as `tt`.
const LEGACY_PASS_MAX_SIDE: u32 = 19;

fn letter_to_index(c: char) -> Option<u32> {
    match c {
        'a'..='z' => Some(c as u32 - 'a' as u32),
        'A'..='Z' => Some(26 + c as u32 - 'A' as u32),
        _ => None,
    }
}

/// Decode one two-letter coordinate such as `"dp"`.
pub fn decode_point(s: &str) -> Option<Point> {
    let mut chars = s.chars();
    let x = letter_to_index(chars.next()?)?;
    let y = letter_to_index(chars.next()?)?;
    if chars.next().is_some() {
        return None;
    }
    Some(Point::new(x, y))
}

/// Whether a move value is a pass: empty, or `tt` on boards no larger than 19x19.
pub fn is_pass(value: &str, board_size: (u32, u32)) -> bool {
    value.is_empty()
        || (value == "tt"
            && board_size.0 <= LEGACY_PASS_MAX_SIDE
            && board_size.1 <= LEGACY_PASS_MAX_SIDE)
}

/// Decode every well-formed coordinate; malformed entries are dropped.
pub fn decode_points<S: AsRef<str>>(params: &[S]) -> Vec<Point> {
    params
        .iter()
        .filter_map(|p| decode_point(p.as_ref()))
        .collect()
}

/// Decode `xy:text` label parameters.
pub fn decode_labels<S: AsRef<str>>(params: &[S]) -> Vec<(Point, String)> {
    params
        .iter()
        .filter_map(|p| {
            let (coord, text) = p.as_ref().split_once(':')?;
            Some((decode_point(coord)?, text.to_string()))
        })
        .collect()
}

/// Decode `xy:xy` line or arrow parameters into `(start, end)` pairs.
pub fn decode_lines<S: AsRef<str>>(params: &[S]) -> Vec<(Point, Point)> {
    params
        .iter()
        .filter_map(|p| {
            let (a, b) = p.as_ref().split_once(':')?;
            Some((decode_point(a)?, decode_point(b)?))
        })
        .collect()
}

/// Parse an `SZ` value: `n` for a square board or `w:h`.
pub fn parse_board_size(value: &str) -> GobanResult<(u32, u32)> {
    let parse = |s: &str| {
        s.trim()
            .parse::<u32>()
            .map_err(|_| GobanError::record(format!("invalid board size '{value}'")))
    };
    let (w, h) = match value.split_once(':') {
        Some((w, h)) => (parse(w)?, parse(h)?),
        None => {
            let n = parse(value)?;
            (n, n)
        }
    };
    if !(1..=MAX_BOARD_SIDE).contains(&w) || !(1..=MAX_BOARD_SIDE).contains(&h) {
        return Err(GobanError::record(format!(
            "board size {w}x{h} outside 1..={MAX_BOARD_SIDE}"
        )));
    }
    Ok((w, h))
}

/// Parse an `MN` value.
pub fn parse_move_number(value: &str) -> GobanResult<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| GobanError::record(format!("invalid move number '{value}'")))
}

impl Command {
    /// Every board point this command refers to, including label anchors and line endpoints.
    ///
    /// Passes on a board of `board_size` refer to no point.
    pub fn referenced_points(&self, board_size: (u32, u32)) -> Vec<Point> {
        match &self.code {
            CommandCode::Label => decode_labels(&self.params)
                .into_iter()
                .map(|(p, _)| p)
                .collect(),
            CommandCode::Line | CommandCode::Arrow => decode_lines(&self.params)
                .into_iter()
                .flat_map(|(a, b)| [a, b])
                .collect(),
            CommandCode::Black | CommandCode::White => self
                .params
                .iter()
                .filter(|v| !is_pass(v.as_str(), board_size))
                .filter_map(|v| decode_point(v))
                .collect(),
            CommandCode::AddBlack
            | CommandCode::AddWhite
            | CommandCode::AddEmpty
            | CommandCode::Circle
            | CommandCode::Dim
            | CommandCode::Cross
            | CommandCode::Select
            | CommandCode::Square
            | CommandCode::Triangle => decode_points(&self.params),
            CommandCode::Size
            | CommandCode::MoveNumber
            | CommandCode::Comment
            | CommandCode::Other(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/coords.rs"]
mod tests;
