//! Sort configuration and stable ordering of table rows

use crate::models::{CellValue, TableRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Header arrow shown next to the active column
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// The single active sort: which row field, which way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortConfig {
    pub field: String,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn ascending(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Ascending,
        }
    }

    /// Config after a header click on `field`.
    ///
    /// Clicking the active field flips its direction, any other field starts
    /// ascending. There is no way back to the unsorted state.
    pub fn next(prev: Option<&SortConfig>, field: &str) -> SortConfig {
        match prev {
            Some(prev) if prev.field == field => SortConfig {
                field: field.to_string(),
                direction: prev.direction.toggled(),
            },
            _ => SortConfig::ascending(field),
        }
    }
}

/// Row indices of `rows` in display order.
///
/// Works on indices so the rows themselves are never reordered. `sort_by` is
/// stable, so rows with equal values keep their input order in both
/// directions.
pub fn sorted_order<R: TableRow>(rows: &[R], config: Option<&SortConfig>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rows.len()).collect();
    let Some(config) = config else {
        return order;
    };

    let keys: Vec<CellValue> = rows
        .iter()
        .map(|row| row.field(&config.field).unwrap_or(CellValue::Null))
        .collect();

    order.sort_by(|&a, &b| {
        let ordering = keys[a].cmp(&keys[b]);
        match config.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    order
}

/// Memoized display order, recomputed only when the data generation or the
/// sort config changes
#[derive(Debug, Default)]
pub(crate) struct SortCache {
    key: Option<(u64, Option<SortConfig>)>,
    order: Vec<usize>,
}

impl SortCache {
    pub(crate) fn order<R: TableRow>(
        &mut self,
        generation: u64,
        rows: &[R],
        config: Option<&SortConfig>,
    ) -> &[usize] {
        let fresh = matches!(
            &self.key,
            Some((cached_gen, cached_config))
                if *cached_gen == generation && cached_config.as_ref() == config
        );
        if !fresh {
            self.order = sorted_order(rows, config);
            self.key = Some((generation, config.cloned()));
        }
        &self.order
    }

    #[cfg(test)]
    pub(crate) fn is_cached(&self, generation: u64, config: Option<&SortConfig>) -> bool {
        matches!(&self.key, Some((g, c)) if *g == generation && c.as_ref() == config)
    }
}
