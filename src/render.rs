//! 端末向けのテーブル整形

use echem_opt_common::{groups_for, FieldGroup, ResultTable, TablePreview, Technique};

/// 列幅をそろえたテキスト表
pub fn format_grid(columns: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(len),
                None => widths.push(len),
            }
        }
    }

    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                let pad = w.saturating_sub(cell.chars().count());
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect();
        padded.join(" | ").trim_end().to_string()
    };

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(columns));
    out.push(separator.join("-+-"));
    for row in rows {
        out.push(line(row));
    }
    out.join("\n")
}

pub fn format_result_table(table: &ResultTable) -> String {
    let columns: Vec<String> = table.columns().iter().map(|c| c.to_string()).collect();
    format_grid(&columns, &table.display_rows())
}

pub fn format_preview(preview: &TablePreview) -> String {
    let mut out = format_grid(&preview.columns, &preview.rows);
    if preview.is_truncated() {
        out.push_str(&format!(
            "\n... ({}行中 {}行を表示)",
            preview.total_rows,
            preview.rows.len()
        ));
    }
    out
}

/// 手法ごとの入力フィールド一覧
pub fn format_fields(technique: Technique) -> String {
    let mut out = vec![format!("{} [{}]", technique.label(), technique.code())];
    for group in groups_for(technique) {
        out.push(format!("  {}", group.label()));
        for name in group.fields() {
            let spec = name.spec();
            out.push(format!(
                "    - {} : {:.*} ～ {:.*} (既定 {:.*}, 刻み {})",
                spec.label,
                spec.decimals(),
                spec.min,
                spec.decimals(),
                spec.max,
                spec.decimals(),
                spec.default,
                spec.step
            ));
        }
    }
    let inactive: Vec<&str> = FieldGroup::ALL
        .iter()
        .filter(|g| !g.is_active_for(technique))
        .map(|g| g.label())
        .collect();
    if !inactive.is_empty() {
        out.push(format!("  N/A: {}", inactive.join(", ")));
    }
    out.join("\n")
}
