use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading a price table from disk
#[derive(Debug, Error)]
pub enum PriceTableError {
    #[error("Failed to read price table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid price table JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Price table is empty")]
    Empty,
}

/// Average sale price per Riyadh neighborhood, in SAR
///
/// Built once at startup and handed to the upstream clients, which forward it
/// as auxiliary context. Names are kept in Arabic, exactly as the recommender
/// models were trained on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NeighborhoodPriceTable {
    entries: BTreeMap<String, f64>,
}

impl NeighborhoodPriceTable {
    pub fn new(entries: BTreeMap<String, f64>) -> Self {
        Self { entries }
    }

    /// Built-in table compiled from the Riyadh average price sheet
    pub fn riyadh() -> Self {
        Self::new(
            RIYADH_AVERAGE_PRICES
                .iter()
                .map(|&(name, price)| (name.to_string(), price))
                .collect(),
        )
    }

    /// Load a `{ "<neighborhood>": <price> }` JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, PriceTableError> {
        let raw = std::fs::read_to_string(path)?;
        let entries: BTreeMap<String, f64> = serde_json::from_str(&raw)?;
        if entries.is_empty() {
            return Err(PriceTableError::Empty);
        }
        Ok(Self::new(entries))
    }

    pub fn get(&self, neighborhood: &str) -> Option<f64> {
        self.entries.get(neighborhood).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, price)| (name.as_str(), *price))
    }

    pub fn as_map(&self) -> &BTreeMap<String, f64> {
        &self.entries
    }
}

impl From<BTreeMap<String, f64>> for NeighborhoodPriceTable {
    fn from(entries: BTreeMap<String, f64>) -> Self {
        Self::new(entries)
    }
}

const RIYADH_AVERAGE_PRICES: &[(&str, f64)] = &[
    ("حي احد", 915000.0),
    ("حي اشبيلية", 1775000.0),
    ("حي الازدهار", 2069200.0),
    ("حي البديعة", 2000000.0),
    ("حي التعاون", 1499000.0),
    ("حي الجرادية", 5500000.0),
    ("حي الجنادرية", 1086710.0),
    ("حي الحائر", 300450.0),
    ("حي الحزم", 883936.1765),
    ("حي الحمراء", 2975125.0),
    ("حي الخالدية", 843000.0),
    ("حي الخليج", 1539142.857),
    ("حي الدار البيضاء", 558984.2105),
    ("حي الربوة", 1300000.0),
    ("حي الربيع", 3800000.0),
    ("حي الرحمانية", 7680000.0),
    ("حي الرمال", 1292908.182),
    ("حي الروابي", 1402500.0),
    ("حي الروضة", 2317725.364),
    ("حي الرياض", 863984.875),
    ("حي الريان", 2012500.0),
    ("حي الزاهر", 712708.25),
    ("حي الزهرة", 668035.7143),
    ("حي السحاب", 660000.0),
    ("حي السعادة", 997187.5),
    ("حي السليمانية", 3004250.0),
    ("حي السويدي", 632631.5789),
    ("حي السويدي الغربي", 950000.0),
    ("حي الشعلة", 550.0),
    ("حي الشفا", 722499.75),
    ("حي الشهداء", 1690200.0),
    ("حي الصحافة", 5099142.857),
    ("حي الصفا", 12499500.0),
    ("حي الضباط", 3700000.0),
    ("حي العارض", 2078962.687),
    ("حي العريجاء", 1000000.0),
    ("حي العريجاء الغربية", 615000.0),
    ("حي العريجاء الوسطى", 1666666.667),
    ("حي العزيزية", 873500.0),
    ("حي العقيق", 3187500.0),
    ("حي العلا", 535.0),
    ("حي العليا", 3088572.222),
    ("حي العمل", 1400000.0),
    ("حي العوالي", 735263.1579),
    ("حي العود", 540000.0),
    ("حي الغنامية", 360450.0),
    ("حي الفاروق", 1700000.0),
    ("حي الفيحاء", 2320000.0),
    ("حي القادسية", 1075469.697),
    ("حي القيروان", 5265714.286),
    ("حي المرسلات", 10000.0),
    ("حي المرقب", 280000.0),
    ("حي المروة", 360000.0),
    ("حي المروج", 1519000.0),
    ("حي المشرق", 1900000.0),
    ("حي المصفاة", 1729950.0),
    ("حي المصيف", 1100000.0),
    ("حي المعذر", 1500000.0),
    ("حي المعيزلة", 1376000.0),
    ("حي المغرزات", 6714333.333),
    ("حي الملز", 4250000.0),
    ("حي الملقا", 5156000.0),
    ("حي الملك عبدالله", 9000000.0),
    ("حي الملك فهد", 4800000.0),
    ("حي الملك فيصل", 1383428.571),
    ("حي المنصورية", 6000000.0),
    ("حي المهدية", 2479853.659),
    ("حي المونسية", 1848384.233),
    ("حي النخيل", 1497500.0),
    ("حي الندى", 3000000.0),
    ("حي النرجس", 3349515.625),
    ("حي النزهة", 3475000.0),
    ("حي النسيم الشرقي", 775637.5),
    ("حي النسيم الغربي", 326500.0),
    ("حي النظيم", 1633333.333),
    ("حي النفل", 2100000.0),
    ("حي النهضة", 2982000.0),
    ("حي الوادي", 2433333.333),
    ("حي الورود", 4666666.667),
    ("حي الوسام", 630000.0),
    ("حي الياسمين", 3475086.957),
    ("حي اليرموك", 2231666.667),
    ("حي بدر", 639533.8462),
    ("حي بنبان", 4500000.0),
    ("حي جرير", 7500000.0),
    ("حي حطين", 5940000.0),
    ("حي حي البيان", 1118987.5),
    ("حي حي السدره", 1950000.0),
    ("حي ديراب", 910000.0),
    ("حي سدرة", 2350000.0),
    ("حي سلطانة", 1800000.0),
    ("حي شبرا", 855056.1798),
    ("حي ضاحية نمار", 974998.5),
    ("حي طويق", 881116.0732),
    ("حي طيبة", 765454.5455),
    ("حي ظهرة لبن", 1108425.774),
    ("حي عرقة", 3460000.0),
    ("حي عريض", 290514.6),
    ("حي عكاظ", 833181.8182),
    ("حي عليشة", 900000.0),
    ("حي غبيرة", 5000000.0),
    ("حي غرناطة", 5500000.0),
    ("حي قرطبة", 2511250.0),
    ("حي لبن", 750000.0),
    ("حي مخطط الخير", 2333333.333),
    ("حي مطار الملك خالد الدولي", 3266666.667),
    ("حي منفوحة", 965000.0),
    ("حي نمار", 927500.0),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_riyadh_table_contents() {
        let table = NeighborhoodPriceTable::riyadh();

        assert_eq!(table.len(), RIYADH_AVERAGE_PRICES.len());
        assert_eq!(table.get("حي الملقا"), Some(5156000.0));
        assert_eq!(table.get("حي غير موجود"), None);
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let mut entries = BTreeMap::new();
        entries.insert("حي لبن".to_string(), 750000.0);
        let table = NeighborhoodPriceTable::from(entries);

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["حي لبن"], 750000.0);
    }

    fn price_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = NeighborhoodPriceTable::from_json_file("/nonexistent/prices.json").unwrap_err();
        assert!(matches!(err, PriceTableError::Io(_)));
    }

    #[test]
    fn test_loads_table_from_file() {
        let file = price_file(r#"{"حي لبن": 750000, "حي الملقا": 5156000.5}"#);

        let table = NeighborhoodPriceTable::from_json_file(file.path()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("حي لبن"), Some(750000.0));
        assert_eq!(table.get("حي الملقا"), Some(5156000.5));
    }

    #[test]
    fn test_empty_file_table_is_rejected() {
        let file = price_file("{}");

        let err = NeighborhoodPriceTable::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, PriceTableError::Empty));
    }

    #[test]
    fn test_non_numeric_price_is_a_parse_error() {
        let file = price_file(r#"{"حي لبن": "expensive"}"#);

        let err = NeighborhoodPriceTable::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, PriceTableError::Parse(_)));
    }
}
