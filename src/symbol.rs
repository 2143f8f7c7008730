use std::{fmt::Display, str::FromStr};

use crate::error::{ScError, ScResult};

/// Most a single comparison can hold.
pub const MAX_SELECTION: usize = 3;

/// An exchange ticker symbol, 1 to 5 ASCII letters, stored uppercase.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct StockSymbol(String);

impl FromStr for StockSymbol {
    type Err = ScError;
    fn from_str(s: &str) -> Result<Self, <Self as FromStr>::Err> {
        let s = s.trim();

        if (1..=5).contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(s.to_uppercase()))
        } else {
            Err(ScError::Invalid {
                code: "INVALID_SYMBOL",
                message: format!("Invalid stock symbol '{s}'"),
            })
        }
    }
}

impl Display for StockSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StockSymbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The user's active symbols, unique, insertion order preserved, at most
/// [`MAX_SELECTION`] entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SymbolSelection(Vec<StockSymbol>);

impl SymbolSelection {
    pub fn push(&mut self, symbol: StockSymbol) -> ScResult<()> {
        if self.0.contains(&symbol) {
            return Err(ScError::Invalid {
                code: "DUPLICATE_SYMBOL",
                message: format!("'{symbol}' is already selected"),
            });
        }

        if self.0.len() >= MAX_SELECTION {
            return Err(ScError::Invalid {
                code: "SELECTION_FULL",
                message: format!("At most {MAX_SELECTION} symbols can be compared"),
            });
        }

        self.0.push(symbol);

        Ok(())
    }

    pub fn retain_absent_from(&mut self, excluded: &[StockSymbol]) {
        self.0.retain(|s| !excluded.contains(s));
    }

    pub fn contains(&self, symbol: &StockSymbol) -> bool {
        self.0.contains(symbol)
    }

    pub fn as_slice(&self) -> &[StockSymbol] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &StockSymbol> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<&[StockSymbol]> for SymbolSelection {
    type Error = ScError;
    fn try_from(symbols: &[StockSymbol]) -> Result<Self, Self::Error> {
        let mut selection = Self::default();
        for symbol in symbols {
            selection.push(symbol.clone())?;
        }

        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_from_str() {
        assert_eq!(StockSymbol::from_str("aapl").unwrap().as_str(), "AAPL");
        assert_eq!(StockSymbol::from_str(" msft ").unwrap().as_str(), "MSFT");
        assert_eq!(StockSymbol::from_str("F").unwrap().as_str(), "F");
        assert!(StockSymbol::from_str("").is_err());
        assert!(StockSymbol::from_str("TOOLONG").is_err());
        assert!(StockSymbol::from_str("BRK.B").is_err());
        assert!(StockSymbol::from_str("AAPL1").is_err());
    }

    #[test]
    fn test_selection_unique_and_bounded() {
        let mut selection = SymbolSelection::default();
        selection.push(StockSymbol::from_str("AAPL").unwrap()).unwrap();
        selection.push(StockSymbol::from_str("MSFT").unwrap()).unwrap();

        assert!(selection.push(StockSymbol::from_str("aapl").unwrap()).is_err());
        assert_eq!(selection.len(), 2);

        selection.push(StockSymbol::from_str("GOOG").unwrap()).unwrap();
        assert!(selection.push(StockSymbol::from_str("AMZN").unwrap()).is_err());
    }

    #[test]
    fn test_selection_preserves_insertion_order() {
        let symbols: Vec<StockSymbol> = ["MSFT", "AAPL", "GOOG"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let selection = SymbolSelection::try_from(symbols.as_slice()).unwrap();

        let listed: Vec<&str> = selection.iter().map(|s| s.as_str()).collect();
        assert_eq!(listed, vec!["MSFT", "AAPL", "GOOG"]);
    }

    #[test]
    fn test_selection_retain_absent_from() {
        let symbols: Vec<StockSymbol> = ["AAPL", "MSFT"].iter().map(|s| s.parse().unwrap()).collect();
        let mut selection = SymbolSelection::try_from(symbols.as_slice()).unwrap();

        selection.retain_absent_from(&["MSFT".parse().unwrap()]);
        let listed: Vec<&str> = selection.iter().map(|s| s.as_str()).collect();
        assert_eq!(listed, vec!["AAPL"]);
    }
}
