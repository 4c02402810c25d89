use serde::Deserialize;
use utoipa::IntoParams;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;
// Сдвиг передаётся в БД как знаковое 64-битное число
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Параметры `?page=&page_size=` как они пришли в запросе.
/// Нечисловые значения не ошибка: вместо них берутся значения по умолчанию.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Номер страницы, начиная с 1
    #[param(value_type = Option<i64>)]
    pub page: Option<String>,
    /// Размер страницы, не больше 100
    #[param(value_type = Option<i64>)]
    pub page_size: Option<String>,
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
}

/// Нормализованная страница: номер >= 1, размер 1..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub size: u64,
}

impl Page {
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        let number = match page {
            Some(page) if page > 0 => page as u64,
            _ => 1,
        };
        let size = match page_size {
            Some(size) if size <= 0 => DEFAULT_PAGE_SIZE,
            Some(size) => (size as u64).min(MAX_PAGE_SIZE),
            None => DEFAULT_PAGE_SIZE,
        };
        Self { number, size }
    }

    pub fn offset(&self) -> u64 {
        (self.number - 1).saturating_mul(self.size).min(MAX_OFFSET)
    }

    pub fn limit(&self) -> u64 {
        self.size
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl From<PageQuery> for Page {
    fn from(query: PageQuery) -> Self {
        Self::new(
            parse_number(query.page.as_deref()),
            parse_number(query.page_size.as_deref()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page: Option<i64>, page_size: Option<i64>) -> Page {
        Page::new(page, page_size)
    }

    fn query(page: &str, page_size: &str) -> Page {
        Page::from(PageQuery {
            page: Some(page.to_string()),
            page_size: Some(page_size.to_string()),
        })
    }

    #[test]
    fn missing_params_use_defaults() {
        let p = Page::from(PageQuery::default());
        assert_eq!(p, Page::default());
        assert_eq!(p.offset(), 0);
        assert_eq!(p.limit(), 10);
    }

    #[test]
    fn non_positive_values_fall_back() {
        assert_eq!(page(Some(0), Some(0)), Page { number: 1, size: 10 });
        assert_eq!(page(Some(-3), Some(-1)), Page { number: 1, size: 10 });
    }

    #[test]
    fn non_numeric_values_fall_back() {
        assert_eq!(query("abc", "1.5"), Page::default());
        assert_eq!(query("99999999999999999999", ""), Page::default());
        assert_eq!(query(" 2 ", "25"), Page { number: 2, size: 25 });
    }

    #[test]
    fn page_size_is_capped() {
        let p = page(Some(2), Some(500));
        assert_eq!(p.size, 100);
        assert_eq!(p.offset(), 100);
    }

    #[test]
    fn offset_follows_page_number() {
        let p = page(Some(3), Some(25));
        assert_eq!(p.offset(), 50);
        assert_eq!(p.limit(), 25);
    }

    #[test]
    fn offset_fits_into_i64() {
        let p = page(Some(i64::MAX), Some(100));
        assert_eq!(p.offset(), i64::MAX as u64);
        assert!(i64::try_from(p.offset()).is_ok());
    }
}
