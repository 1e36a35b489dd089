use crate::error::AppResult;
use crate::infrastructure::SheetTable;

/// 待纠正的一行文本
///
/// 结果写回同一行的输出列，不新增行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionRow {
    /// 数据行索引（从 0 开始，不含表头）
    pub row_index: usize,
    pub input: String,
}

impl CorrectionRow {
    /// 读取输入列的所有数据行（空文本也会发送）
    pub fn from_table(table: &SheetTable, input_column: &str) -> AppResult<Vec<Self>> {
        let col = table.require_column(input_column)?;
        Ok((0..table.len())
            .map(|row_index| Self {
                row_index,
                input: table.cell(row_index, col),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_row_positions() {
        let mut table = SheetTable::new("Plan1", vec!["Input".into(), "Output".into()]);
        table.push_row(vec!["Ola mundo".into()]);
        table.push_row(vec!["".into(), "ja corrigido".into()]);

        let rows = CorrectionRow::from_table(&table, "Input").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].input, "Ola mundo");
        assert_eq!(rows[1].row_index, 1);
        assert_eq!(rows[1].input, "");
    }
}
