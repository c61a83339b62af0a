use pest_types::EmplacementKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PestAction {
    Place {
        row: u32,
        col: u32,
        kind: EmplacementKind,
    },
}
