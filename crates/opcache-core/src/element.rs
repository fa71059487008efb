//! 數值元素類型

/// 運算處理的數值元素類型
///
/// 每種元素類型擁有獨立的工廠實例，相同簽名在不同類型之間互不共用。
pub trait Element: Copy + Send + Sync + 'static {
    /// 類型名稱（用於日誌）
    const NAME: &'static str;
}

impl Element for f32 {
    const NAME: &'static str = "f32";
}

impl Element for f64 {
    const NAME: &'static str = "f64";
}
