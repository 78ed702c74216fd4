use std::fmt;

use crate::column::Scalar;
use crate::dataframe::base::DataFrame;

impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 最大表示行数
        const MAX_ROWS: usize = 10;

        if self.column_count() == 0 {
            return write!(f, "DataFrame (0 rows x 0 columns)");
        }

        writeln!(
            f,
            "DataFrame ({} rows x {} columns):",
            self.row_count(),
            self.column_count()
        )?;

        // 列ヘッダーの表示
        write!(f, "{:<5} |", "idx")?;
        for name in self.column_names() {
            write!(f, " {:<15} |", name)?;
        }
        writeln!(f)?;

        // 区切り線
        write!(f, "{:-<5}-+", "")?;
        for _ in 0..self.column_count() {
            write!(f, "-{:-<15}-+", "")?;
        }
        writeln!(f)?;

        let display_rows = self.row_count().min(MAX_ROWS);
        for i in 0..display_rows {
            let label = self.index().get(i).unwrap_or(Scalar::Null);
            write!(f, "{:<5} |", label.to_string())?;
            for column in self.columns() {
                let value = match column.get(i) {
                    Ok(Scalar::Float64(v)) => format!("{:.3}", v),
                    Ok(Scalar::String(s)) => format!("\"{}\"", s),
                    Ok(other) => other.to_string(),
                    Err(_) => "NULL".to_string(),
                };
                write!(f, " {:<15} |", value)?;
            }
            writeln!(f)?;
        }

        if self.row_count() > MAX_ROWS {
            writeln!(f, "... ({} more rows)", self.row_count() - MAX_ROWS)?;
        }
        Ok(())
    }
}
