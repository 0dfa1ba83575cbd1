//! The three fixed relations and the schema descriptor read back from a store.

// ─── Fixed relations ─────────────────────────────────────────────────────────

/// A named table with a column list that is known ahead of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
  pub name:    &'static str,
  pub columns: &'static [&'static str],
}

impl Relation {
  /// `name(col_a, col_b, …)`, as written in the prompt.
  pub fn signature(&self) -> String {
    format!("{}({})", self.name, self.columns.join(", "))
  }
}

pub const AD_SALES: Relation = Relation {
  name:    "ad_sales",
  columns: &[
    "date",
    "item_id",
    "ad_sales",
    "impressions",
    "ad_spend",
    "clicks",
    "units_sold",
  ],
};

pub const TOTAL_SALES: Relation = Relation {
  name:    "total_sales",
  columns: &["date", "item_id", "total_sales", "total_units_ordered"],
};

pub const ELIGIBILITY: Relation = Relation {
  name:    "eligibility",
  columns: &["eligibility_datetime_utc", "item_id", "eligibility", "message"],
};

/// All relations, in load order.
pub const RELATIONS: [Relation; 3] = [AD_SALES, TOTAL_SALES, ELIGIBILITY];

// ─── Schema descriptor ───────────────────────────────────────────────────────

/// One column as reported by the store's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
  pub name:          String,
  /// Declared type; empty when the store reports none.
  pub declared_type: String,
}

/// A table and its ordered columns. Derived on demand, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
  pub name:    String,
  pub columns: Vec<ColumnInfo>,
}

impl TableSchema {
  pub fn column_names(&self) -> Vec<&str> {
    self.columns.iter().map(|c| c.name.as_str()).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn signatures_match_source_headers() {
    assert_eq!(
      AD_SALES.signature(),
      "ad_sales(date, item_id, ad_sales, impressions, ad_spend, clicks, units_sold)"
    );
    assert_eq!(
      TOTAL_SALES.signature(),
      "total_sales(date, item_id, total_sales, total_units_ordered)"
    );
    assert_eq!(
      ELIGIBILITY.signature(),
      "eligibility(eligibility_datetime_utc, item_id, eligibility, message)"
    );
  }
}
