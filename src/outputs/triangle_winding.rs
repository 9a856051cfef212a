/// The order the vertices of an output triangle are listed in
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TriangleWinding {
    Counterclockwise,
    Clockwise,
}

impl TriangleWinding {
    /// Puts counterclockwise vertices `[a, b, c]` into this winding
    pub fn arrange<T>(self, [a, b, c]: [T; 3]) -> [T; 3] {
        match self {
            Self::Counterclockwise => [a, b, c],
            Self::Clockwise => [a, c, b],
        }
    }
}
