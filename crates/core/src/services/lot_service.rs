use crate::convert::CurrencyConverter;
use crate::models::transaction::{OpenLot, Transaction, TransactionType};

/// Reconstructs the currently-open buy lots from a holding's transaction
/// history via FIFO matching.
///
/// Pure business logic — no I/O. The resulting lots are the single source
/// of truth for cost basis, holding-period start and benchmark comparison.
pub struct LotService;

impl LotService {
    pub fn new() -> Self {
        Self
    }

    /// Fold a (possibly unsorted) transaction list into the open lots,
    /// oldest first. Amounts are converted to the base currency at each
    /// transaction's own date.
    ///
    /// - `Buy` and `Reinvest` (with positive shares) open a new lot.
    /// - `Sell` consumes from the oldest lot first; a partially consumed
    ///   lot keeps its amount proportional to the shares left.
    /// - `Split` divides every open lot's shares by the ratio; amounts are
    ///   untouched.
    /// - Everything else (dividends, fees, taxes, transfers) leaves lots
    ///   alone.
    ///
    /// Sells that exceed the shares on hand stop matching at zero rather
    /// than going negative. That usually means the history is missing a
    /// transfer or split, so it is logged as a consistency warning.
    pub fn open_lots(
        &self,
        transactions: &[Transaction],
        converter: &dyn CurrencyConverter,
    ) -> Vec<OpenLot> {
        let mut sorted: Vec<&Transaction> = transactions.iter().collect();
        sorted.sort_by_key(|tx| tx.date);

        let mut lots: Vec<OpenLot> = Vec::new();

        for tx in sorted {
            match tx.transaction_type {
                TransactionType::Buy | TransactionType::Reinvest => {
                    if tx.shares > 0.0 {
                        let amount = converter.convert(&tx.currency, tx.amount, tx.date);
                        lots.push(OpenLot::new(tx.clone(), tx.shares, amount));
                    }
                }
                TransactionType::Sell => {
                    Self::consume_fifo(&mut lots, tx.shares.abs(), tx);
                }
                TransactionType::Split => {
                    if let Some(ratio) = tx.split_ratio.filter(|r| *r > 0.0) {
                        for lot in &mut lots {
                            lot.remaining_shares /= ratio;
                        }
                    }
                }
                TransactionType::Dividend
                | TransactionType::Distribution
                | TransactionType::Tax
                | TransactionType::Fee
                | TransactionType::Transfer => {}
            }
        }

        lots
    }

    /// Consume `shares_to_sell` from the front of the lot queue. A lot with
    /// fewer shares than needed is removed whole; the lot the sell ends in
    /// is reduced proportionally so cost basis tracks the shares left.
    fn consume_fifo(lots: &mut Vec<OpenLot>, mut shares_to_sell: f64, sell: &Transaction) {
        while shares_to_sell > 0.0 {
            let Some(oldest) = lots.first_mut() else {
                // Oversold: more shares sold than ever bought. Matching
                // stops at zero; flag it since it usually means a missing
                // transfer or split in the data.
                log::warn!(
                    "sell of {} shares on {} exceeds open lots; {} shares unmatched",
                    sell.shares,
                    sell.date,
                    shares_to_sell
                );
                return;
            };

            if oldest.remaining_shares <= shares_to_sell {
                shares_to_sell -= oldest.remaining_shares;
                lots.remove(0);
            } else {
                let fraction = shares_to_sell / oldest.remaining_shares;
                oldest.remaining_amount -= oldest.remaining_amount * fraction;
                oldest.remaining_shares -= shares_to_sell;
                shares_to_sell = 0.0;
            }
        }
    }

    /// Total shares across all open lots.
    pub fn total_shares(lots: &[OpenLot]) -> f64 {
        lots.iter().map(|l| l.remaining_shares).sum()
    }

    /// Total cost basis (base currency) across all open lots.
    pub fn total_cost_basis(lots: &[OpenLot]) -> f64 {
        lots.iter().map(|l| l.remaining_amount).sum()
    }
}

impl Default for LotService {
    fn default() -> Self {
        Self::new()
    }
}
