use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print left-aligned columns sized to their widest cell, with a dashed
/// rule under the header row.
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    for line in render_table(headers, &rows) {
        println!("{line}");
    }
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(String::len)
                .chain([h.len()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render_row = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut lines = vec![render_row(&header_cells), rule.join("  ")];
    lines.extend(rows.iter().map(|row| render_row(row)));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_to_widest_cell() {
        let lines = render_table(
            &["ID", "PROJECT"],
            &[
                vec!["1".into(), "todo".into()],
                vec!["23".into(), "inventory-tracker".into()],
            ],
        );
        assert_eq!(lines[0], "ID  PROJECT");
        assert_eq!(lines[1], "--  -----------------");
        assert_eq!(lines[2], "1   todo");
        assert_eq!(lines[3], "23  inventory-tracker");
    }

    #[test]
    fn header_wider_than_cells_sets_the_column() {
        let lines = render_table(&["CREATED"], &[vec!["x".into()]]);
        assert_eq!(lines[1], "-------");
        assert_eq!(lines[2], "x");
    }

    #[test]
    fn empty_rows_still_render_header() {
        let lines = render_table(&["ID", "TASKS"], &[]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "ID  TASKS");
    }
}
