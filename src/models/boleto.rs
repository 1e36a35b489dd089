//! 博莱托（巴西银行缴款单）提取结果

use serde_json::Value;

/// Gemini 返回 JSON 中的字段名，同时也是输出表格的表头（不含最后一列）
pub const BENEFICIARIO: &str = "Beneficiário";
pub const AGENCIA_CODIGO: &str = "Agência/Código do Beneficiário";
pub const NOSSO_NUMERO: &str = "Nosso Número";
pub const VALOR_DOCUMENTO: &str = "Valor do Documento";
pub const DATA_VENCIMENTO: &str = "Data de Vencimento";
pub const PAGADOR: &str = "Pagador";
pub const ENDERECO: &str = "Endereço";
pub const CPF: &str = "CPF";
pub const CODIGO_BARRAS: &str = "Código de Barras";
pub const NOME_ARQUIVO: &str = "Nome do Arquivo PDF";

/// 输出表格的表头，顺序与 [`BoletoRecord::to_row`] 一致
pub const BOLETO_HEADERS: [&str; 10] = [
    BENEFICIARIO,
    AGENCIA_CODIGO,
    NOSSO_NUMERO,
    VALOR_DOCUMENTO,
    DATA_VENCIMENTO,
    PAGADOR,
    ENDERECO,
    CPF,
    CODIGO_BARRAS,
    NOME_ARQUIVO,
];

/// 一张博莱托的提取结果，所有字段均为纯文本，不做校验
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoletoRecord {
    pub beneficiary: String,
    pub beneficiary_code: String,
    pub document_number: String,
    pub document_value: String,
    pub due_date: String,
    pub payer_name: String,
    pub payer_address: String,
    pub payer_tax_id: String,
    pub barcode: String,
    pub source_file: String,
}

impl BoletoRecord {
    /// 从 Gemini 返回的 JSON 对象构建记录
    ///
    /// 缺失的键记为空字符串；数字等非字符串值按文本保存
    pub fn from_json(value: &Value, source_file: impl Into<String>) -> Self {
        let field = |key: &str| value.get(key).map(value_text).unwrap_or_default();

        Self {
            beneficiary: field(BENEFICIARIO),
            beneficiary_code: field(AGENCIA_CODIGO),
            document_number: field(NOSSO_NUMERO),
            document_value: field(VALOR_DOCUMENTO),
            due_date: field(DATA_VENCIMENTO),
            payer_name: field(PAGADOR),
            payer_address: field(ENDERECO),
            payer_tax_id: field(CPF),
            barcode: field(CODIGO_BARRAS),
            source_file: source_file.into(),
        }
    }

    /// 转换为表格的一行
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.beneficiary.clone(),
            self.beneficiary_code.clone(),
            self.document_number.clone(),
            self.document_value.clone(),
            self.due_date.clone(),
            self.payer_name.clone(),
            self.payer_address.clone(),
            self.payer_tax_id.clone(),
            self.barcode.clone(),
            self.source_file.clone(),
        ]
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_portuguese_keys_in_header_order() {
        let value = json!({
            "Beneficiário": "Loja Exemplo LTDA",
            "Agência/Código do Beneficiário": "1234/56789-0",
            "Nosso Número": "000123",
            "Valor do Documento": "R$ 150,00",
            "Data de Vencimento": "10/01/2025",
            "Pagador": "Maria Silva",
            "Endereço": "Rua A, 10",
            "CPF": "123.456.789-00",
            "Código de Barras": "34191.79001 01043.510047"
        });

        let record = BoletoRecord::from_json(&value, "boleto1.pdf");
        let row = record.to_row();

        assert_eq!(row.len(), BOLETO_HEADERS.len());
        assert_eq!(row[0], "Loja Exemplo LTDA");
        assert_eq!(row[7], "123.456.789-00");
        assert_eq!(row[9], "boleto1.pdf");
    }

    #[test]
    fn missing_and_non_string_values() {
        let value = json!({
            "Valor do Documento": 150.5,
            "Pagador": null
        });

        let record = BoletoRecord::from_json(&value, "b.pdf");

        assert_eq!(record.document_value, "150.5");
        assert_eq!(record.payer_name, "");
        assert_eq!(record.beneficiary, "");
    }
}
