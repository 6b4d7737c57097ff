//! Grid layout hints for large sibling groups

/// Siblings at or below this count are left to the layout engine
const GRID_THRESHOLD: usize = 3;

/// Arrange sibling identifiers into a roughly square grid
///
/// Each row of `ceil(sqrt(n))` identifiers is ranked together and the row
/// heads are chained with invisible edges so rows stack instead of forming
/// one long line.
pub fn arrange_grid(guids: &[String]) -> String {
    if guids.len() <= GRID_THRESHOLD {
        return String::new();
    }
    let row_len = (guids.len() as f64).sqrt().ceil() as usize;

    let mut out = String::new();
    let mut row_heads = Vec::new();
    for row in guids.chunks(row_len) {
        row_heads.push(&row[0]);
        out.push_str("{rank=same;");
        for guid in row {
            out.push_str(guid);
            out.push(';');
        }
        out.push_str("}\n");
    }
    for pair in row_heads.windows(2) {
        out.push_str(&format!(
            "{}->{}[penwidth=0;minlen=1;arrowsize=0];\n",
            pair[0], pair[1]
        ));
    }
    out
}
