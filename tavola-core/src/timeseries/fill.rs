use tavola_types::AlignedTable;

/// Forward-fill then backward-fill a single column.
///
/// A column with no present value is returned unchanged.
#[must_use]
pub fn fill_gaps(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut last = None;
    let mut out: Vec<Option<f64>> = values
        .iter()
        .map(|v| {
            if v.is_some() {
                last = *v;
            }
            last
        })
        .collect();

    // After the forward pass only a leading run can still be absent.
    if let Some(first) = out.iter().find_map(|v| *v) {
        for cell in out.iter_mut().take_while(|c| c.is_none()) {
            *cell = Some(first);
        }
    }
    out
}

/// Fill every column of an aligned table independently.
#[must_use]
pub fn fill_table(mut table: AlignedTable) -> AlignedTable {
    for col in &mut table.columns {
        col.values = fill_gaps(&col.values);
    }
    table
}
