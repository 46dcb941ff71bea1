/// Human-readable name of a dashboard series.
#[must_use]
pub fn label(metric: &str) -> &str {
    match metric {
        "productPower" => "PV",
        "usePower" => "Consumption",
        "selfUsePower" => "Self-use",
        "onGridPower" => "Export",
        "buyPower" => "Import",
        "chargePower" => "Charge",
        "dischargePower" => "Discharge",
        "chargeAndDisChargePower" => "Battery",
        "dieselProductPower" => "Generator",
        _ => metric,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        assert_eq!(label("usePower"), "Consumption");
        assert_eq!(label("mysteryPower"), "mysteryPower");
    }
}
