//! Quote arithmetic: total, deposit and local-currency equivalent.
//!
//! All amounts are exact decimals. Nothing here rounds or formats; display
//! rounding to two places happens in [`crate::money`] at presentation time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::schema::FormSchema;
use crate::state::FormState;

/// Priced snapshot of a form session at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Base price plus every selected non-negotiable extra.
    pub total_usd: Decimal,
    /// Portion due now, per the chosen deposit percent.
    pub deposit_usd: Decimal,
    /// Deposit converted at the session's exchange rate, absent while the
    /// rate never resolved.
    pub deposit_local: Option<Decimal>,
    /// Exchange rate snapshot the conversion used.
    pub rate: Option<Decimal>,
}

/// Price the current state of a session.
///
/// Selected negotiable extras contribute nothing to the computed total;
/// their price is advisory and quoted separately by hand.
pub fn quote(schema: &FormSchema, state: &FormState, rate: Option<Decimal>) -> Quote {
    let extras_usd: Decimal = schema
        .extras
        .iter()
        .filter(|e| !e.negotiable && state.extras_selected.get(&e.id).copied().unwrap_or(false))
        .map(|e| e.price)
        .sum();
    let total_usd = schema.base_price + extras_usd;
    let deposit_usd = total_usd * state.deposit_percent.as_fraction();
    let deposit_local = rate.map(|r| deposit_usd * r);

    Quote {
        total_usd,
        deposit_usd,
        deposit_local,
        rate,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DepositPercent;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn schema() -> FormSchema {
        serde_json::from_value(json!({
            "id": "heladeria",
            "title": "Cotización",
            "basePrice": 350,
            "sections": [
                {
                    "id": "negocio",
                    "title": "Tu negocio",
                    "questions": [
                        { "id": "nombreNegocio", "label": "Nombre", "type": "text" }
                    ]
                }
            ],
            "extras": [
                { "id": "app", "title": "App", "description": "x", "price": 150 },
                { "id": "pagos", "title": "Pagos", "description": "x",
                  "price": 0, "negotiable": true }
            ],
            "paymentMethods": [
                {
                    "id": "zelle", "label": "Zelle", "details": [],
                    "fields": [
                        { "id": "correoZelle", "label": "Correo",
                          "type": "email", "placeholder": "" }
                    ]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn base_price_alone_when_nothing_selected() {
        let schema = schema();
        let state = FormState::seed(&schema);
        let q = quote(&schema, &state, None);
        assert_eq!(q.total_usd, dec!(350));
        assert_eq!(q.deposit_usd, dec!(350));
        assert_eq!(q.deposit_local, None);
        assert_eq!(q.rate, None);
    }

    #[test]
    fn non_negotiable_extra_adds_exactly_its_price() {
        let schema = schema();
        let mut state = FormState::seed(&schema);
        let before = quote(&schema, &state, None).total_usd;

        state.toggle_extra("app", true).unwrap();
        let after = quote(&schema, &state, None).total_usd;
        assert_eq!(after - before, dec!(150));

        state.toggle_extra("app", false).unwrap();
        assert_eq!(quote(&schema, &state, None).total_usd, before);
    }

    #[test]
    fn negotiable_extra_never_changes_total() {
        let schema = schema();
        let mut state = FormState::seed(&schema);
        let before = quote(&schema, &state, None).total_usd;
        state.toggle_extra("pagos", true).unwrap();
        assert_eq!(quote(&schema, &state, None).total_usd, before);
    }

    #[test]
    fn deposit_is_exact_fraction_of_total() {
        let schema = schema();
        let mut state = FormState::seed(&schema);
        state.set_deposit_percent(DepositPercent::Sixty);
        let q = quote(&schema, &state, None);
        assert_eq!(q.deposit_usd, q.total_usd * dec!(0.60));

        state.set_deposit_percent(DepositPercent::Full);
        let q = quote(&schema, &state, None);
        assert_eq!(q.deposit_usd, q.total_usd);
    }

    #[test]
    fn full_scenario_with_rate() {
        let schema = schema();
        let mut state = FormState::seed(&schema);
        state.toggle_extra("app", true).unwrap();
        state.set_deposit_percent(DepositPercent::Sixty);

        let q = quote(&schema, &state, Some(dec!(40)));
        assert_eq!(q.total_usd, dec!(500));
        assert_eq!(q.deposit_usd, dec!(300.00));
        assert_eq!(q.deposit_local, Some(dec!(12000.00)));
        assert_eq!(q.rate, Some(dec!(40)));
    }

    #[test]
    fn later_rate_overwrites_earlier_conversion() {
        let schema = schema();
        let state = FormState::seed(&schema);
        let stale = quote(&schema, &state, Some(dec!(36.5)));
        let fresh = quote(&schema, &state, Some(dec!(40.1)));
        assert_eq!(stale.deposit_local, Some(dec!(350) * dec!(36.5)));
        assert_eq!(fresh.deposit_local, Some(dec!(350) * dec!(40.1)));
    }
}
