//! Output formatting for offers (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::offer::Offer;

/// Formats offers for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the offer list.
    pub fn format_offers(&self, offers: &[Offer]) -> String {
        if offers.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_header(),
                _ => "No offers found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_offers(offers),
            OutputFormat::Table => self.table_offers(offers),
            OutputFormat::Markdown => self.markdown_offers(offers),
            OutputFormat::Csv => self.csv_offers(offers),
        }
    }

    // JSON formatting

    fn json_offers(&self, offers: &[Offer]) -> String {
        serde_json::to_string_pretty(offers).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn table_offers(&self, offers: &[Offer]) -> String {
        let retailer_width = 12;
        let price_width = 12;
        let status_width = 18;
        let shipping_width = 20;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<retailer_width$}  {:<price_width$}  {:<status_width$}  {:<shipping_width$}  {}",
            "Retailer", "Price", "Status", "Shipping", "URL"
        ));
        lines.push(format!(
            "{:-<retailer_width$}  {:-<price_width$}  {:-<status_width$}  {:-<shipping_width$}  {:-<40}",
            "", "", "", "", ""
        ));

        for offer in offers {
            let price_str = Self::price_label(offer);

            lines.push(format!(
                "{:<retailer_width$}  {:>price_width$}  {:<status_width$}  {:<shipping_width$}  {}",
                Self::retailer_label(offer),
                price_str,
                offer.status,
                offer.shipping,
                offer.url
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} offers", offers.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_offers(&self, offers: &[Offer]) -> String {
        let mut lines = Vec::new();

        lines.push("| Retailer | Price | Status | Shipping | Link |".to_string());
        lines.push("|----------|-------|--------|----------|------|".to_string());

        for offer in offers {
            lines.push(format!(
                "| {} | {} | {} | {} | [View]({}) |",
                Self::retailer_label(offer),
                Self::price_label(offer),
                offer.status,
                offer.shipping,
                offer.url
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} offers found*", offers.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "retailer,price,status,shipping,url,estimated,best".to_string()
    }

    fn csv_offers(&self, offers: &[Offer]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for offer in offers {
            let price = offer.price.map(|p| p.to_string()).unwrap_or_default();

            lines.push(format!(
                "{},{},{},{},{},{},{}",
                Self::csv_escape(&offer.retailer),
                price,
                Self::csv_escape(&offer.status),
                Self::csv_escape(&offer.shipping),
                offer.url,
                offer.estimated,
                offer.best
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }

    /// Retailer column with the best-offer mark.
    fn retailer_label(offer: &Offer) -> String {
        if offer.best {
            format!("{} *", offer.retailer)
        } else {
            offer.retailer.clone()
        }
    }

    /// Price column; estimates are flagged so they are never mistaken for
    /// fetched prices.
    fn price_label(offer: &Offer) -> String {
        match offer.price {
            Some(p) if offer.estimated => format!("~{}", p),
            Some(p) => p.to_string(),
            None => "N/A".to_string(),
        }
    }
}
