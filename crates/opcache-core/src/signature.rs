//! 參數簽名與鍵推導

use std::fmt::Debug;
use std::hash::Hash;

use crate::OpKind;

/// 運算的參數簽名
///
/// 快取表直接以簽名本身作為鍵（`Hash + Eq`），結構相等的簽名必定命中同一筆。
/// `get` 與 `set` 都經由同一個實作推導鍵，欄位順序不會不一致。
pub trait Signature: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// 簽名所屬的運算種類
    const KIND: OpKind;

    /// 依固定順序寫出各欄位的十進位字串，欄位之間不加分隔符
    fn write_fields(&self, out: &mut String);

    /// 文字鍵：種類前綴 + 欄位序列
    ///
    /// 僅用於日誌與錯誤訊息，查表不使用此字串。
    fn legacy_key(&self) -> String {
        let mut key = String::from(Self::KIND.prefix());
        self.write_fields(&mut key);
        key
    }
}

/// 將整數序列依序附加為十進位字串
pub fn push_ints(out: &mut String, values: &[i32]) {
    use std::fmt::Write;

    for value in values {
        // 寫入 String 不會失敗
        let _ = write!(out, "{}", value);
    }
}
