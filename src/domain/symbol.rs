use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::EnumIter;

/// The currency pairs the dashboard knows how to plot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, clap::ValueEnum,
)]
pub enum Symbol {
    EurUsd,
    GbpJpy,
    EurJpy,
}

impl Symbol {
    /// Six letter code, e.g. "EURUSD"
    pub fn code(&self) -> &'static str {
        match self {
            Symbol::EurUsd => "EURUSD",
            Symbol::GbpJpy => "GBPJPY",
            Symbol::EurJpy => "EURJPY",
        }
    }

    /// Base and quote currency, split the way FX endpoints want them.
    pub fn base_and_quote(&self) -> (&'static str, &'static str) {
        let code = self.code();
        (&code[..3], &code[3..])
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Symbol::EurUsd => "EUR/USD",
            Symbol::GbpJpy => "GBP/JPY",
            Symbol::EurJpy => "EUR/JPY",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn codes_split_into_base_and_quote() {
        assert_eq!(Symbol::GbpJpy.base_and_quote(), ("GBP", "JPY"));
        for symbol in Symbol::iter() {
            let (base, quote) = symbol.base_and_quote();
            assert_eq!(format!("{}{}", base, quote), symbol.code());
            assert_eq!(symbol.display_name(), format!("{}/{}", base, quote));
        }
    }
}
