/// Instruction identifier of a record property.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommandCode {
    /// `SZ`: board size, `n` or `w:h`.
    Size,
    /// `AB`: setup black stones.
    AddBlack,
    /// `AW`: setup white stones.
    AddWhite,
    /// `AE`: clear cells.
    AddEmpty,
    /// `B`: black move, no parameter for a pass.
    Black,
    /// `W`: white move, no parameter for a pass.
    White,
    /// `MN`: move number override.
    MoveNumber,
    /// `CR`: circle marker.
    Circle,
    /// `DD`: dimmed cell marker.
    Dim,
    /// `MA`: cross marker.
    Cross,
    /// `SL`: selected cell marker.
    Select,
    /// `SQ`: square marker.
    Square,
    /// `TR`: triangle marker.
    Triangle,
    /// `LB`: text labels, `xy:text`.
    Label,
    /// `LN`: connecting lines, `xy:xy`.
    Line,
    /// `AR`: arrows, `xy:xy`.
    Arrow,
    /// `C`: comment text.
    Comment,
    /// Any other property identifier; ignored when rendering.
    Other(String),
}

impl CommandCode {
    /// Map a property identifier such as `"AB"` to its code.
    pub fn from_ident(ident: &str) -> Self {
        match ident {
            "SZ" => Self::Size,
            "AB" => Self::AddBlack,
            "AW" => Self::AddWhite,
            "AE" => Self::AddEmpty,
            "B" => Self::Black,
            "W" => Self::White,
            "MN" => Self::MoveNumber,
            "CR" => Self::Circle,
            "DD" => Self::Dim,
            "MA" => Self::Cross,
            "SL" => Self::Select,
            "SQ" => Self::Square,
            "TR" => Self::Triangle,
            "LB" => Self::Label,
            "LN" => Self::Line,
            "AR" => Self::Arrow,
            "C" => Self::Comment,
            other => Self::Other(other.to_string()),
        }
    }

    /// Property identifier as written in a record.
    pub fn ident(&self) -> &str {
        match self {
            Self::Size => "SZ",
            Self::AddBlack => "AB",
            Self::AddWhite => "AW",
            Self::AddEmpty => "AE",
            Self::Black => "B",
            Self::White => "W",
            Self::MoveNumber => "MN",
            Self::Circle => "CR",
            Self::Dim => "DD",
            Self::Cross => "MA",
            Self::Select => "SL",
            Self::Square => "SQ",
            Self::Triangle => "TR",
            Self::Label => "LB",
            Self::Line => "LN",
            Self::Arrow => "AR",
            Self::Comment => "C",
            Self::Other(s) => s,
        }
    }

    /// Codes that only decorate the board and never change its stones.
    pub fn is_annotation(&self) -> bool {
        matches!(
            self,
            Self::Arrow
                | Self::Comment
                | Self::Circle
                | Self::Dim
                | Self::Label
                | Self::Line
                | Self::Cross
                | Self::MoveNumber
                | Self::Select
                | Self::Square
                | Self::Triangle
        )
    }

    /// Marker kind drawn by this code, if it is a point marker.
    pub fn marker(&self) -> Option<MarkerKind> {
        Some(match self {
            Self::Circle => MarkerKind::Circle,
            Self::Dim => MarkerKind::Dim,
            Self::Cross => MarkerKind::Cross,
            Self::Select => MarkerKind::Select,
            Self::Square => MarkerKind::Square,
            Self::Triangle => MarkerKind::Triangle,
            _ => return None,
        })
    }
}

/// Point marker graphics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// Hollow circle.
    Circle,
    /// Dimmed cell.
    Dim,
    /// Diagonal cross.
    Cross,
    /// Selection dot.
    Select,
    /// Hollow square.
    Square,
    /// Hollow triangle.
    Triangle,
}

impl MarkerKind {
    /// All marker kinds in a fixed order.
    pub const ALL: [MarkerKind; 6] = [
        Self::Circle,
        Self::Dim,
        Self::Cross,
        Self::Select,
        Self::Square,
        Self::Triangle,
    ];

    /// Whether a parameterless instruction of this kind clears every cell bearing it.
    pub fn clears_when_empty(self) -> bool {
        matches!(self, Self::Dim | Self::Select)
    }

    /// Short lowercase name, used for exported file names.
    pub fn name(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Dim => "dim",
            Self::Cross => "cross",
            Self::Select => "select",
            Self::Square => "square",
            Self::Triangle => "triangle",
        }
    }
}

/// One decoded `(code, parameters)` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    /// Instruction identifier.
    pub code: CommandCode,
    /// Raw string parameters in source order.
    pub params: Vec<String>,
}

impl Command {
    /// Build a command from an identifier and its parameters.
    pub fn new<S: Into<String>>(ident: &str, params: impl IntoIterator<Item = S>) -> Self {
        Self {
            code: CommandCode::from_ident(ident),
            params: params.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered commands of one record node. Node 0 is the setup node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordNode {
    /// Commands in source order.
    pub commands: Vec<Command>,
}

impl RecordNode {
    /// Build a node from its commands.
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    /// Whether every command only annotates.
    pub fn is_annotation_only(&self) -> bool {
        self.commands.iter().all(|c| c.code.is_annotation())
    }
}
