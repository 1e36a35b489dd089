//! 表格读写 - 基础设施层
//!
//! 读取用 calamine，写入用 rust_xlsxwriter。rust_xlsxwriter 不能原地修改文件，
//! 因此每次保存都会把整个工作簿（所有工作表）重新写出。
//! 单元格保留 calamine 读到的类型（数字、布尔、日期），写回时按类型写出。

use std::path::Path;

use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader};
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tracing::debug;

use crate::error::{AppError, AppResult, ExcelError};

/// 新建工作簿时使用的默认工作表名
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

const MS_PER_DAY: f64 = 86_400_000.0;

/// 一张工作表：首行为表头，其余为数据行
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub name: String,
    /// 表头单元格在工作表中的位置 (行, 列)，从 0 开始
    pub origin: (u32, u16),
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Data>>,
}

impl SheetTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            origin: (0, 0),
            headers,
            rows: Vec::new(),
        }
    }

    /// 追加一行文本，空字符串视为空单元格
    pub fn push_row(&mut self, values: Vec<String>) {
        self.rows.push(values.into_iter().map(text_data).collect());
    }

    /// 按表头查找列（忽略首尾空白）
    pub fn column_index(&self, header: &str) -> Option<usize> {
        let wanted = header.trim();
        self.headers.iter().position(|h| h.trim() == wanted)
    }

    pub fn require_column(&self, header: &str) -> AppResult<usize> {
        self.column_index(header)
            .ok_or_else(|| AppError::missing_column(&self.name, header))
    }

    /// 单元格原始值，超出行宽的单元格视为空
    pub fn value(&self, row: usize, col: usize) -> &Data {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&Data::Empty)
    }

    /// 单元格的文本形式
    pub fn cell(&self, row: usize, col: usize) -> String {
        cell_text(self.value(row, col))
    }

    /// 整张表的文本形式
    pub fn rows_text(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| r.iter().map(cell_text).collect())
            .collect()
    }

    pub fn is_blank_row(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .map_or(true, |r| r.iter().all(|c| cell_text(c).trim().is_empty()))
    }

    /// 替换单元格内容为文本，行宽不足时补空单元格
    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) -> AppResult<()> {
        let len = self.rows.len();
        let cells = self
            .rows
            .get_mut(row)
            .ok_or(AppError::Excel(ExcelError::RowOutOfRange { row, len }))?;
        if cells.len() <= col {
            cells.resize(col + 1, Data::Empty);
        }
        cells[col] = text_data(value.into());
        Ok(())
    }

    /// 返回列索引；表头中不存在时追加为新列
    pub fn ensure_column(&mut self, header: &str) -> usize {
        match self.column_index(header) {
            Some(idx) => idx,
            None => {
                self.headers.push(header.to_string());
                self.headers.len() - 1
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn text_data(value: String) -> Data {
    if value.is_empty() {
        Data::Empty
    } else {
        Data::String(value)
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::DateTime(dt) if dt.is_datetime() => match dt.as_datetime() {
            Some(value) if value.time() == chrono::NaiveTime::MIN => {
                value.format("%Y-%m-%d").to_string()
            }
            Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        other => other.to_string(),
    }
}

/// 转换为 1900 日期系统的序列值
fn excel_serial(dt: &ExcelDateTime) -> f64 {
    if dt.is_duration() {
        return dt.as_f64();
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).and_then(|d| d.and_hms_opt(0, 0, 0));
    match (dt.as_datetime(), epoch) {
        (Some(value), Some(epoch)) => (value - epoch).num_milliseconds() as f64 / MS_PER_DAY,
        _ => dt.as_f64(),
    }
}

struct CellFormats {
    date: Format,
    datetime: Format,
    duration: Format,
}

impl CellFormats {
    fn new() -> Self {
        Self {
            date: Format::new().set_num_format("yyyy-mm-dd"),
            datetime: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
            duration: Format::new().set_num_format("[h]:mm:ss"),
        }
    }
}

/// 按 calamine 读到的类型写出单元格
fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &Data,
    formats: &CellFormats,
) -> Result<(), XlsxError> {
    match value {
        Data::Empty => Ok(()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            worksheet.write_string(row, col, s).map(|_| ())
        }
        Data::Int(n) => worksheet.write_number(row, col, *n as f64).map(|_| ()),
        Data::Float(n) => worksheet.write_number(row, col, *n).map(|_| ()),
        Data::Bool(b) => worksheet.write_boolean(row, col, *b).map(|_| ()),
        Data::DateTime(dt) => {
            let serial = excel_serial(dt);
            let format = if dt.is_duration() {
                &formats.duration
            } else if serial.fract() == 0.0 {
                &formats.date
            } else {
                &formats.datetime
            };
            worksheet
                .write_number_with_format(row, col, serial, format)
                .map(|_| ())
        }
        // 公式错误值无法原样写回，保留其文本
        Data::Error(e) => worksheet.write_string(row, col, e.to_string()).map(|_| ()),
    }
}

/// 读取工作簿中的所有工作表
pub fn read_workbook(path: &Path) -> AppResult<Vec<SheetTable>> {
    let path_str = path.display().to_string();
    let mut workbook = open_workbook_auto(path).map_err(|source| {
        AppError::Excel(ExcelError::OpenFailed {
            path: path_str.clone(),
            source,
        })
    })?;

    let names: Vec<String> = workbook.sheet_names().to_vec();
    let mut tables = Vec::with_capacity(names.len());

    for name in names {
        let range = workbook.worksheet_range(&name).map_err(|source| {
            AppError::Excel(ExcelError::OpenFailed {
                path: path_str.clone(),
                source,
            })
        })?;

        // calamine 的 Range 从第一个非空单元格开始，记录其位置以便原位写回
        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        let mut rows = range.rows().map(|row| row.to_vec());
        let headers: Vec<String> = rows
            .next()
            .map(|row| row.iter().map(cell_text).collect())
            .unwrap_or_default();
        let rows: Vec<Vec<Data>> = rows.collect();

        debug!(
            "读取工作表 '{}': {} 列, {} 行, 起始 ({}, {})",
            name,
            headers.len(),
            rows.len(),
            start_row,
            start_col
        );

        tables.push(SheetTable {
            name,
            origin: (start_row, start_col as u16),
            headers,
            rows,
        });
    }

    Ok(tables)
}

/// 读取一张工作表；`sheet` 为 `None` 时读取第一张（活动）工作表
pub fn read_sheet(path: &Path, sheet: Option<&str>) -> AppResult<SheetTable> {
    let mut tables = read_workbook(path)?;
    let position = match sheet {
        Some(name) => tables.iter().position(|t| t.name == name),
        None => (!tables.is_empty()).then_some(0),
    };

    match position {
        Some(idx) => Ok(tables.swap_remove(idx)),
        None => Err(AppError::Excel(ExcelError::SheetNotFound {
            path: path.display().to_string(),
            sheet: sheet.unwrap_or(DEFAULT_SHEET_NAME).to_string(),
        })),
    }
}

/// 覆盖写出整个工作簿
pub fn write_workbook(path: &Path, tables: &[SheetTable]) -> AppResult<()> {
    let path_str = path.display().to_string();
    let wrap = |source: XlsxError| {
        AppError::Excel(ExcelError::WriteFailed {
            path: path_str.clone(),
            source,
        })
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| AppError::io(parent.display().to_string(), e))?;
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let formats = CellFormats::new();

    for table in tables {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&table.name).map_err(wrap)?;
        let (top, left) = table.origin;

        for (col, header) in table.headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            worksheet
                .write_string_with_format(top, left + col as u16, header, &header_format)
                .map_err(wrap)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                write_cell(
                    worksheet,
                    top + row_idx as u32 + 1,
                    left + col as u16,
                    value,
                    &formats,
                )
                .map_err(wrap)?;
            }
        }
    }

    workbook.save(path).map_err(wrap)?;
    debug!("已保存表格: {}", path_str);
    Ok(())
}

/// 在第一张工作表末尾追加一行
///
/// 文件不存在或工作表为空时先写入 `headers`。已有行保持不变。
pub fn append_row(path: &Path, headers: &[&str], row: Vec<String>) -> AppResult<()> {
    let mut tables = if path.exists() {
        read_workbook(path)?
    } else {
        Vec::new()
    };

    if tables.is_empty() {
        tables.push(SheetTable::new(DEFAULT_SHEET_NAME, Vec::new()));
    }

    let table = &mut tables[0];
    if table.headers.is_empty() {
        table.headers = headers.iter().map(|h| h.to_string()).collect();
    }
    table.push_row(row);

    write_workbook(path, &tables)
}

/// 替换指定工作表中一个单元格的内容
///
/// `row_index` 从 0 开始，不含表头行。列不存在时追加到表头末尾。
/// 其它单元格、其它行和其它工作表保持不变。
pub fn update_cell(
    path: &Path,
    sheet: &str,
    row_index: usize,
    column: &str,
    value: impl Into<String>,
) -> AppResult<()> {
    let mut tables = read_workbook(path)?;
    let table = tables
        .iter_mut()
        .find(|t| t.name == sheet)
        .ok_or_else(|| {
            AppError::Excel(ExcelError::SheetNotFound {
                path: path.display().to_string(),
                sheet: sheet.to_string(),
            })
        })?;

    let col = table.ensure_column(column);
    table.set_cell(row_index, col, value)?;

    write_workbook(path, &tables)
}
