//! accessors/i18n.rs
//! Adding translations to i18n strings.
//!
//! Design notes:
//! - The header's locale table (tag 100) lists the languages; element `i` of
//!   every i18n string is the translation for table entry `i`.
//! - Slots without a translation hold empty strings.

use bytes::{BufMut, BytesMut};

use crate::codec::value::{encode_strings, split_strings};
use crate::constants::DEFAULT_LOCALE;
use crate::index::store::TagIndex;
use crate::index::types::{IndexError, TagType, TagValue};
use crate::tags::{Tag, HEADER_I18NTABLE};

impl TagIndex {
    /// Set the `lang` translation (default `"C"`) of i18n string `tag`.
    ///
    /// Creates the locale table and the entry as needed; an existing
    /// translation for `lang` is replaced.
    pub fn add_i18n_string(&mut self, tag: Tag, text: &str, lang: Option<&str>) -> Result<(), IndexError> {
        let lang = lang.filter(|l| !l.is_empty()).unwrap_or(DEFAULT_LOCALE);
        let text_bytes = encode_strings(tag, [text])?;

        let has_table = self.find(HEADER_I18NTABLE, Some(TagType::StringArray)).is_some();
        let has_entry = self.find(tag, Some(TagType::I18nString)).is_some();
        if !has_table && has_entry {
            return Err(IndexError::MissingI18nTable { tag });
        }
        if !has_table {
            let mut langs = vec![DEFAULT_LOCALE];
            if lang != DEFAULT_LOCALE {
                langs.push(lang);
            }
            self.add(HEADER_I18NTABLE, &TagValue::string_array(langs))?;
        }

        let slot = match self.lang_slot(lang) {
            Some(slot) => slot,
            None => {
                let slot = self.table_len();
                self.append(HEADER_I18NTABLE, &TagValue::string_array([lang]))?;
                slot
            }
        };

        let Some(pos) = self.position(tag, Some(TagType::I18nString)) else {
            let mut values = vec![String::new(); slot];
            values.push(text.to_string());
            return self.add(tag, &TagValue::I18nString(values));
        };

        let entry = &self.entries[pos];
        let count = entry.count as usize;
        let mut buf = BytesMut::with_capacity(entry.data.len() + text_bytes.len() + slot);

        if slot >= count {
            // Pad missing slots with empty strings, then append.
            buf.extend_from_slice(&entry.data);
            buf.put_bytes(0, slot - count);
            buf.extend_from_slice(&text_bytes);
            self.replace_at(pos, slot as u32 + 1, buf.freeze());
        } else {
            for (i, s) in split_strings(&entry.data, entry.count).enumerate() {
                if i == slot {
                    buf.extend_from_slice(&text_bytes);
                } else {
                    buf.extend_from_slice(s);
                    buf.put_u8(0);
                }
            }
            self.replace_at(pos, count as u32, buf.freeze());
        }
        Ok(())
    }

    /// Position of `lang` in the locale table.
    fn lang_slot(&self, lang: &str) -> Option<usize> {
        let table = self.find(HEADER_I18NTABLE, Some(TagType::StringArray))?;
        split_strings(&table.data, table.count).position(|l| l == lang.as_bytes())
    }

    fn table_len(&self) -> usize {
        self.find(HEADER_I18NTABLE, Some(TagType::StringArray))
            .map_or(0, |t| t.count as usize)
    }
}
