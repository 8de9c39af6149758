//! Deterministic XML rendering for the filing forms.
//!
//! Element order is fixed and values are escaped by hand, so identical
//! form data always yields byte-identical output. Schema validation is the
//! filing gateway's job, not ours.

use super::types::{BucketTotals, Form401Data, Form403Data};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// Minimal element writer with two-space indentation.
struct XmlBuilder {
    out: String,
    depth: usize,
}

impl XmlBuilder {
    fn new() -> Self {
        Self {
            out: format!("{XML_DECLARATION}\n"),
            depth: 0,
        }
    }

    fn open(&mut self, name: &str) {
        self.indent();
        self.out.push('<');
        self.out.push_str(name);
        self.out.push_str(">\n");
        self.depth += 1;
    }

    fn close(&mut self, name: &str) {
        self.depth -= 1;
        self.indent();
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push_str(">\n");
    }

    fn leaf(&mut self, name: &str, value: &str) {
        self.indent();
        self.out.push('<');
        self.out.push_str(name);
        self.out.push('>');
        self.out.push_str(&escape(value));
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push_str(">\n");
    }

    fn leaf_i64(&mut self, name: &str, value: i64) {
        self.leaf(name, &value.to_string());
    }

    fn bucket(&mut self, name: &str, totals: BucketTotals) {
        self.open(name);
        self.leaf("Count", &totals.count.to_string());
        self.leaf_i64("Untaxed", totals.untaxed);
        self.leaf_i64("Tax", totals.tax);
        self.close(name);
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// Renders Form 401 as XML.
#[must_use]
pub fn form_401_xml(form: &Form401Data) -> String {
    let mut xml = XmlBuilder::new();
    xml.open("VatReturn401");
    xml.leaf("TaxRegistrationNumber", &form.tax_registration_number);
    xml.leaf("Year", &form.period.year().to_string());
    xml.leaf("Period", &form.period.index().to_string());
    xml.bucket("TaxableSales", form.taxable_sales);
    xml.bucket("ZeroRatedSales", form.zero_rated_sales);
    xml.bucket("DeductiblePurchases", form.deductible_purchases);
    xml.bucket("NonDeductiblePurchases", form.non_deductible_purchases);
    xml.leaf_i64("OutputTax", form.output_tax);
    xml.leaf_i64("InputTax", form.input_tax);
    xml.leaf_i64("TaxPayable", form.tax_payable);
    xml.close("VatReturn401");
    xml.finish()
}

/// Renders Form 403 as XML.
#[must_use]
pub fn form_403_xml(form: &Form403Data) -> String {
    let mut xml = XmlBuilder::new();
    xml.open("VatReturn403");
    xml.leaf("TaxRegistrationNumber", &form.tax_registration_number);
    xml.leaf("Year", &form.period.year().to_string());
    xml.leaf("Period", &form.period.index().to_string());
    xml.bucket("TaxableSales", form.taxable_sales);
    xml.bucket("ZeroRatedSales", form.zero_rated_sales);
    xml.bucket("ExemptSales", form.exempt_sales);
    xml.bucket("DeductiblePurchases", form.deductible_purchases);
    xml.bucket("NonDeductiblePurchases", form.non_deductible_purchases);
    xml.leaf_i64("OutputTax", form.output_tax);
    xml.leaf_i64("InputTax", form.input_tax);
    xml.leaf_i64("TaxPayable", form.tax_payable);
    xml.close("VatReturn403");
    xml.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fiscal::BiMonth;

    fn form_401() -> Form401Data {
        Form401Data {
            tax_registration_number: "12345678".into(),
            period: BiMonth::new(2025, 2).unwrap(),
            taxable_sales: BucketTotals {
                count: 2,
                untaxed: 100_000,
                tax: 5000,
            },
            zero_rated_sales: BucketTotals::default(),
            deductible_purchases: BucketTotals {
                count: 1,
                untaxed: 40_000,
                tax: 2000,
            },
            non_deductible_purchases: BucketTotals::default(),
            output_tax: 5000,
            input_tax: 2000,
            tax_payable: 3000,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&apos;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_form_401_xml_shape() {
        let xml = form_401_xml(&form_401());
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<VatReturn401>"));
        assert!(xml.ends_with("</VatReturn401>\n"));
        assert!(xml.contains("<TaxRegistrationNumber>12345678</TaxRegistrationNumber>"));
        assert!(xml.contains("<TaxPayable>3000</TaxPayable>"));
        assert!(xml.contains("<Untaxed>100000</Untaxed>"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let form = form_401();
        assert_eq!(form_401_xml(&form), form_401_xml(&form));
    }

    #[test]
    fn test_negative_payable_rendered_as_is() {
        let mut form = form_401();
        form.tax_payable = -1500;
        assert!(form_401_xml(&form).contains("<TaxPayable>-1500</TaxPayable>"));
    }
}
