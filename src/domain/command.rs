use strum::IntoEnumIterator;

use crate::domain::symbol::Symbol;

/// Everything the toolbar can ask the chart to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartCommand {
    Plot(Symbol),
    Clear,
}

impl ChartCommand {
    /// Toolbar order: one plot button per symbol, then clear.
    pub fn toolbar() -> Vec<ChartCommand> {
        Symbol::iter()
            .map(ChartCommand::Plot)
            .chain(std::iter::once(ChartCommand::Clear))
            .collect()
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChartCommand::Plot(symbol) => symbol.display_name(),
            ChartCommand::Clear => "Clear Plot",
        }
    }
}
