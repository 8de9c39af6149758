//! Line-shape and balance validation.
//!
//! Draft creation checks shape only (balance may be achieved through later
//! edits); posting additionally requires exact balance.

use rust_decimal::Decimal;

use super::error::JournalError;
use super::types::{LineInput, TransactionLine};

/// Validates draft-shape rules: at least two lines, every amount
/// non-negative, exactly one side non-zero per line.
///
/// # Errors
///
/// Returns [`JournalError::InsufficientLines`] or [`JournalError::InvalidLine`].
pub fn validate_line_shape(lines: &[LineInput]) -> Result<(), JournalError> {
    if lines.len() < 2 {
        return Err(JournalError::InsufficientLines);
    }

    for (i, line) in lines.iter().enumerate() {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(JournalError::InvalidLine(format!(
                "line {i}: amounts must be non-negative"
            )));
        }
        let has_debit = line.debit > Decimal::ZERO;
        let has_credit = line.credit > Decimal::ZERO;
        if has_debit && has_credit {
            return Err(JournalError::InvalidLine(format!(
                "line {i}: a line cannot carry both a debit and a credit"
            )));
        }
        if !has_debit && !has_credit {
            return Err(JournalError::InvalidLine(format!(
                "line {i}: a line must carry a debit or a credit"
            )));
        }
    }

    Ok(())
}

/// Sums debits and credits over stored lines.
#[must_use]
pub fn totals(lines: &[TransactionLine]) -> (Decimal, Decimal) {
    lines.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(debit, credit), line| (debit + line.debit, credit + line.credit),
    )
}

/// Requires exact debit/credit equality.
///
/// # Errors
///
/// Returns [`JournalError::UnbalancedEntry`] carrying both totals.
pub fn ensure_balanced(lines: &[TransactionLine]) -> Result<(), JournalError> {
    let (debit, credit) = totals(lines);
    if debit == credit {
        Ok(())
    } else {
        Err(JournalError::UnbalancedEntry { debit, credit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tabula_shared::types::{AccountId, JournalEntryId, TransactionLineId};

    fn line(debit: Decimal, credit: Decimal) -> TransactionLine {
        TransactionLine {
            id: TransactionLineId::new(),
            journal_entry_id: JournalEntryId::new(),
            account_id: AccountId::new(),
            debit,
            credit,
            tax_code_id: None,
            counterparty_id: None,
            description: None,
        }
    }

    #[test]
    fn test_single_line_rejected() {
        let lines = vec![LineInput::debit(AccountId::new(), dec!(100))];
        assert!(matches!(
            validate_line_shape(&lines),
            Err(JournalError::InsufficientLines)
        ));
    }

    #[test]
    fn test_both_sides_rejected() {
        let mut bad = LineInput::debit(AccountId::new(), dec!(100));
        bad.credit = dec!(50);
        let lines = vec![bad, LineInput::credit(AccountId::new(), dec!(100))];
        assert!(matches!(
            validate_line_shape(&lines),
            Err(JournalError::InvalidLine(_))
        ));
    }

    #[test]
    fn test_zero_line_rejected() {
        let lines = vec![
            LineInput::debit(AccountId::new(), Decimal::ZERO),
            LineInput::credit(AccountId::new(), dec!(100)),
        ];
        assert!(matches!(
            validate_line_shape(&lines),
            Err(JournalError::InvalidLine(_))
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let lines = vec![
            LineInput::debit(AccountId::new(), dec!(-10)),
            LineInput::credit(AccountId::new(), dec!(-10)),
        ];
        assert!(matches!(
            validate_line_shape(&lines),
            Err(JournalError::InvalidLine(_))
        ));
    }

    #[test]
    fn test_unbalanced_draft_shape_is_fine() {
        // Balance is a posting-time rule, not a draft-time rule.
        let lines = vec![
            LineInput::debit(AccountId::new(), dec!(100)),
            LineInput::credit(AccountId::new(), dec!(30)),
        ];
        assert!(validate_line_shape(&lines).is_ok());
    }

    #[test]
    fn test_ensure_balanced() {
        let ok = vec![line(dec!(100), dec!(0)), line(dec!(0), dec!(100))];
        assert!(ensure_balanced(&ok).is_ok());

        let bad = vec![line(dec!(100), dec!(0)), line(dec!(0), dec!(90))];
        match ensure_balanced(&bad) {
            Err(JournalError::UnbalancedEntry { debit, credit }) => {
                assert_eq!(debit, dec!(100));
                assert_eq!(credit, dec!(90));
            }
            other => panic!("expected UnbalancedEntry, got {other:?}"),
        }
    }

    #[test]
    fn test_totals_sums_both_sides() {
        let lines = vec![
            line(dec!(70), dec!(0)),
            line(dec!(30), dec!(0)),
            line(dec!(0), dec!(100)),
        ];
        assert_eq!(totals(&lines), (dec!(100), dec!(100)));
    }
}
