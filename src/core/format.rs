//! 内容协商
//!
//! show 路由的 id 段可以带格式后缀（`/users/1.json`），没有后缀时看 `Accept` 头。
//! 每个处理器只支持一种格式，其它格式一律 406。

use axum::http::{header, HeaderMap};

use super::error::CoreError;

/// 响应格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Xml,
}

impl ResponseFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    /// 该格式能满足的媒体类型
    fn media_types(self) -> &'static [&'static str] {
        match self {
            Self::Json => &["application/json", "application/*", "*/*"],
            Self::Xml => &["application/xml", "text/xml", "application/*", "text/*", "*/*"],
        }
    }

    /// `q=0` 表示明确拒绝；具体类型被拒绝时通配符也不能再接受它
    fn accepts(self, accept: &str) -> bool {
        let ranges: Vec<(&str, bool)> = accept
            .split(',')
            .filter_map(|range| {
                let mut parts = range.split(';');
                let media = parts.next()?.trim();
                let refused = parts.any(|param| match param.trim().split_once('=') {
                    Some((key, value)) if key.trim().eq_ignore_ascii_case("q") => {
                        value.trim().parse::<f32>().map_or(false, |q| q <= 0.0)
                    }
                    _ => false,
                });
                (!media.is_empty()).then_some((media, refused))
            })
            .collect();

        let primary = self.media_types()[0];
        if ranges
            .iter()
            .any(|(media, refused)| *refused && media.eq_ignore_ascii_case(primary))
        {
            return false;
        }

        ranges.iter().filter(|(_, refused)| !refused).any(|(media, _)| {
            self.media_types()
                .iter()
                .any(|m| m.eq_ignore_ascii_case(media))
        })
    }
}

/// 拆分 `id.ext`，没有后缀时返回 `None`
pub fn split_format(segment: &str) -> (&str, Option<&str>) {
    match segment.rsplit_once('.') {
        Some((id, ext)) if !id.is_empty() && !ext.is_empty() => (id, Some(ext)),
        _ => (segment, None),
    }
}

/// 校验请求能否以 `format` 响应，返回去掉后缀的 id
pub fn negotiate<'a>(
    segment: &'a str,
    headers: &HeaderMap,
    format: ResponseFormat,
) -> Result<&'a str, CoreError> {
    let (id, ext) = split_format(segment);

    if let Some(ext) = ext {
        return match ResponseFormat::from_extension(ext) {
            Some(requested) if requested == format => Ok(id),
            _ => Err(CoreError::NotAcceptable(format!(
                "format '{}' is not available, use '{}'",
                ext,
                format.extension()
            ))),
        };
    }

    match headers.get(header::ACCEPT).and_then(|h| h.to_str().ok()) {
        None => Ok(id),
        Some(accept) if accept.trim().is_empty() || format.accepts(accept) => Ok(id),
        Some(accept) => Err(CoreError::NotAcceptable(format!(
            "cannot satisfy Accept: {}",
            accept
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn split_format_handles_suffixes() {
        assert_eq!(split_format("42"), ("42", None));
        assert_eq!(split_format("42.json"), ("42", Some("json")));
        assert_eq!(split_format(".json"), (".json", None));
        assert_eq!(split_format("42."), ("42.", None));
    }

    #[test]
    fn extension_must_match_handler_format() {
        let headers = HeaderMap::new();
        assert_eq!(negotiate("1.xml", &headers, ResponseFormat::Xml).unwrap(), "1");
        assert!(matches!(
            negotiate("1.json", &headers, ResponseFormat::Xml),
            Err(CoreError::NotAcceptable(_))
        ));
        assert!(matches!(
            negotiate("1.csv", &headers, ResponseFormat::Json),
            Err(CoreError::NotAcceptable(_))
        ));
    }

    #[test]
    fn accept_header_is_consulted_without_suffix() {
        assert!(negotiate("1", &HeaderMap::new(), ResponseFormat::Json).is_ok());
        assert!(negotiate("1", &accept("*/*"), ResponseFormat::Xml).is_ok());
        assert!(negotiate(
            "1",
            &accept("text/html, application/json;q=0.9"),
            ResponseFormat::Json
        )
        .is_ok());
        assert!(negotiate("1", &accept("text/xml"), ResponseFormat::Xml).is_ok());
        assert!(negotiate("1", &accept("text/html"), ResponseFormat::Json).is_err());
        assert!(negotiate("1", &accept("application/json"), ResponseFormat::Xml).is_err());
    }

    #[test]
    fn zero_quality_is_a_refusal() {
        assert!(negotiate("1", &accept("application/json;q=0"), ResponseFormat::Json).is_err());
        assert!(negotiate("1", &accept("application/json; q=0.0"), ResponseFormat::Json).is_err());
        assert!(negotiate("1", &accept("application/json; q=0.5"), ResponseFormat::Json).is_ok());
        assert!(negotiate(
            "1",
            &accept("*/*;q=0, application/json"),
            ResponseFormat::Json
        )
        .is_ok());
        assert!(negotiate("1", &accept("*/*;q=0, application/json"), ResponseFormat::Xml).is_err());
        assert!(negotiate("1", &accept("application/json;q=0, */*"), ResponseFormat::Json).is_err());
        assert!(negotiate("1", &accept("application/json;q=0, */*"), ResponseFormat::Xml).is_ok());
    }
}
