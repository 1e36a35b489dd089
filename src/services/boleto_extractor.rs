//! 博莱托提取服务 - 业务能力层
//!
//! 只负责"从 Gemini 返回文本得到结构化记录"，不关心上传和写表

use serde_json::{Map, Value};

use crate::error::{AppError, AppResult, GeminiError};
use crate::models::BoletoRecord;

/// 发送给 Gemini 的提取提示词
pub const EXTRACTION_PROMPT: &str = "Me retorne em json as seguintes informações do arquivo pdf: \
Beneficiário, Agência/Código do Beneficiário, Nosso Número, Valor do Documento, \
Data de Vencimento, Pagador, Endereço, CPF e Código de Barras. \
Não precisa escrever json antes, só retorne no formato de um.";

/// 去掉模型回复首尾的 Markdown 代码块标记（```json / ```）
pub fn strip_code_fences(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```") {
        // 语言标记只占开头一行
        body = rest
            .strip_prefix("json")
            .or_else(|| rest.strip_prefix("JSON"))
            .unwrap_or(rest);
    }
    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }

    body.trim()
}

/// 解析模型回复为 JSON 对象
///
/// 先去掉代码块标记；仍然失败时截取第一个 `{` 到最后一个 `}` 之间的内容再试一次
pub fn parse_extraction(text: &str) -> AppResult<Map<String, Value>> {
    let body = strip_code_fences(text);

    match serde_json::from_str::<Map<String, Value>>(body) {
        Ok(map) => Ok(map),
        Err(first_err) => {
            let inner = match (body.find('{'), body.rfind('}')) {
                (Some(start), Some(end)) if start < end => &body[start..=end],
                _ => return Err(malformed(text, first_err)),
            };
            serde_json::from_str::<Map<String, Value>>(inner).map_err(|_| malformed(text, first_err))
        }
    }
}

/// 解析回复并构建记录
pub fn extract_record(text: &str, source_file: &str) -> AppResult<BoletoRecord> {
    let map = parse_extraction(text)?;
    Ok(BoletoRecord::from_json(&Value::Object(map), source_file))
}

fn malformed(text: &str, source: serde_json::Error) -> AppError {
    AppError::Gemini(GeminiError::MalformedJson {
        text: text.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let text = "```json\n{\"CPF\": \"123\"}\n```\n";
        assert_eq!(strip_code_fences(text), "{\"CPF\": \"123\"}");
    }

    #[test]
    fn strips_bare_fence_and_keeps_plain_text() {
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn fence_markers_inside_values_are_kept() {
        let text = "```json\n{\"Pagador\": \"a```b\"}\n```";
        let map = parse_extraction(text).unwrap();
        assert_eq!(map["Pagador"], "a```b");
    }

    #[test]
    fn parses_object_after_leading_prose() {
        let text = "Aqui está o json:\n{\"Nosso Número\": \"000123\"}";
        let record = extract_record(text, "x.pdf").unwrap();
        assert_eq!(record.document_number, "000123");
        assert_eq!(record.source_file, "x.pdf");
    }

    #[test]
    fn malformed_json_is_an_error_not_a_panic() {
        let err = parse_extraction("```json\n{\"CPF\": \n```").unwrap_err();
        assert!(matches!(err, AppError::Gemini(GeminiError::MalformedJson { .. })));

        let err = parse_extraction("[1, 2]").unwrap_err();
        assert!(matches!(err, AppError::Gemini(GeminiError::MalformedJson { .. })));
    }
}
