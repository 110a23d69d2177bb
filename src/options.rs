/// Vertical shift applied to the reaction label by [`LabelOffset::Raised`].
pub const RAISED_LABEL_DY: f64 = -20.0;

/// Where a reaction label sits relative to the midpoint of the first trunk segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LabelOffset {
    /// 20 units above the midpoint, as the SBML converter places it.
    #[default]
    Raised,
    /// Exactly on the midpoint, as the CellDesigner converter places it.
    Midpoint,
}

impl LabelOffset {
    pub fn dy(self) -> f64 {
        match self {
            LabelOffset::Raised => RAISED_LABEL_DY,
            LabelOffset::Midpoint => 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub label_offset: LabelOffset,
}
