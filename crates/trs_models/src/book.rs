//! Books of trades.

use trs_core::types::Currency;

use crate::error::InstrumentError;
use crate::trs::TotalReturnSwap;

/// One position in a book: a trade and its collateral currency.
#[derive(Clone, Debug, PartialEq)]
pub struct BookEntry {
    /// The trade.
    pub trade: TotalReturnSwap,
    /// Collateral currency; discounting keys off this.
    pub collateral: Currency,
}

/// A named collection of trades priced together.
///
/// Append-only during construction; [`Book::freeze`] seals it before
/// pricing, after which further appends fail.
///
/// # Example
///
/// ```
/// use trs_models::book::Book;
///
/// let mut book = Book::new("desk-a");
/// assert!(!book.is_frozen());
/// book.freeze();
/// assert!(book.is_frozen());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Book {
    name: String,
    entries: Vec<BookEntry>,
    frozen: bool,
}

impl Book {
    /// Creates an empty, unfrozen book.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            frozen: false,
        }
    }

    /// Returns the book name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a trade with its collateral currency.
    ///
    /// # Errors
    ///
    /// `InstrumentError::BookFrozen` after [`Book::freeze`].
    pub fn add(
        &mut self,
        trade: TotalReturnSwap,
        collateral: Currency,
    ) -> Result<(), InstrumentError> {
        if self.frozen {
            return Err(InstrumentError::BookFrozen {
                name: self.name.clone(),
            });
        }
        self.entries.push(BookEntry { trade, collateral });
        Ok(())
    }

    /// Seals the book for pricing.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Returns true once the book is sealed.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Returns the positions in append order.
    pub fn entries(&self) -> &[BookEntry] {
        &self.entries
    }

    /// Returns the position count.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the book has no positions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds a trade by identifier.
    pub fn find(&self, trade_id: &str) -> Option<&BookEntry> {
        self.entries.iter().find(|e| e.trade.trade_id() == trade_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basket::Basket;
    use crate::schedules::Frequency;
    use crate::trs::{ResetPolicy, Side};
    use trs_core::types::{BasketId, Date, DayCountConvention, Ticker};

    fn trade(id: &str) -> TotalReturnSwap {
        TotalReturnSwap::new(
            id,
            Basket::new(BasketId::new("B"))
                .with_component(Ticker::new("AAA"), 1.0)
                .unwrap(),
            ResetPolicy::Periodic,
            0.001,
            DayCountConvention::Act360,
            1_000_000.0,
            Currency::USD,
            Side::ReceiveTotalReturn,
            Date::from_ymd(2020, 6, 15).unwrap(),
            Date::from_ymd(2021, 6, 15).unwrap(),
            Frequency::Quarterly,
        )
        .unwrap()
    }

    #[test]
    fn test_append_then_freeze() {
        let mut book = Book::new("desk-a");
        book.add(trade("TRS-1"), Currency::USD).unwrap();
        book.add(trade("TRS-2"), Currency::EUR).unwrap();
        book.freeze();

        assert_eq!(book.len(), 2);
        let result = book.add(trade("TRS-3"), Currency::USD);
        assert!(matches!(result, Err(InstrumentError::BookFrozen { .. })));
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_find_by_trade_id() {
        let mut book = Book::new("desk-a");
        book.add(trade("TRS-1"), Currency::USD).unwrap();
        assert!(book.find("TRS-1").is_some());
        assert!(book.find("TRS-9").is_none());
    }
}
