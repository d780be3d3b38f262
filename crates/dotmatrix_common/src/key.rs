/// Physical keys a frontend can report to a core.
///
/// This is a deliberately small, frontend-agnostic set; each core maps the
/// subset it cares about onto its own input lines.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Return,
    Space,
    A,
    S,
    Z,
    X,
    None,
}
