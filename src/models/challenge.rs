//! RPA Challenge 表单数据

use crate::error::AppResult;
use crate::infrastructure::SheetTable;

/// 表格中的一行表单数据（只读，不回写）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChallengeRow {
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub role: String,
    pub address: String,
    pub email: String,
    pub phone_number: String,
}

/// 表格列名（按去除首尾空白后比较，原表格的 "Last Name " 带尾随空格）
pub const FIRST_NAME: &str = "First Name";
pub const LAST_NAME: &str = "Last Name";
pub const COMPANY_NAME: &str = "Company Name";
pub const ROLE: &str = "Role in Company";
pub const ADDRESS: &str = "Address";
pub const EMAIL: &str = "Email";
pub const PHONE_NUMBER: &str = "Phone Number";

impl ChallengeRow {
    /// 从表格读取所有数据行，跳过完全空白的行
    pub fn from_table(table: &SheetTable) -> AppResult<Vec<Self>> {
        let first_name = table.require_column(FIRST_NAME)?;
        let last_name = table.require_column(LAST_NAME)?;
        let company_name = table.require_column(COMPANY_NAME)?;
        let role = table.require_column(ROLE)?;
        let address = table.require_column(ADDRESS)?;
        let email = table.require_column(EMAIL)?;
        let phone_number = table.require_column(PHONE_NUMBER)?;

        let rows = (0..table.len())
            .filter(|&r| !table.is_blank_row(r))
            .map(|r| Self {
                first_name: table.cell(r, first_name),
                last_name: table.cell(r, last_name),
                company_name: table.cell(r, company_name),
                role: table.cell(r, role),
                address: table.cell(r, address),
                email: table.cell(r, email),
                phone_number: table.cell(r, phone_number),
            })
            .collect();

        Ok(rows)
    }

    /// 以 (表格列名, 值) 形式遍历所有字段
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            (FIRST_NAME, self.first_name.as_str()),
            (LAST_NAME, self.last_name.as_str()),
            (COMPANY_NAME, self.company_name.as_str()),
            (ROLE, self.role.as_str()),
            (ADDRESS, self.address.as_str()),
            (EMAIL, self.email.as_str()),
            (PHONE_NUMBER, self.phone_number.as_str()),
        ]
    }

    /// 日志中显示的名字
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
