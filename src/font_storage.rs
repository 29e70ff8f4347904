use std::{collections::HashMap, path::PathBuf, sync::Arc};

/// Font database plus a cache of decoded faces.
///
/// `fontdb` knows which faces exist; `fontdue` fonts are only decoded the
/// first time a face is asked for and then shared through `Arc`.
pub struct FontStorage {
    font_db: fontdb::Database,
    decoded: HashMap<fontdb::ID, Arc<fontdue::Font>, fxhash::FxBuildHasher>,
}

impl Default for FontStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStorage {
    pub fn new() -> Self {
        Self {
            font_db: fontdb::Database::new(),
            decoded: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
        }
    }
}

/// Loading
impl FontStorage {
    pub fn load_font_binary(&mut self, data: impl Into<Vec<u8>>) {
        self.font_db.load_font_data(data.into());
    }

    pub fn load_font_file(&mut self, path: PathBuf) -> Result<(), std::io::Error> {
        self.font_db.load_font_file(path)
    }

    pub fn load_fonts_dir(&mut self, dir: PathBuf) {
        self.font_db.load_fonts_dir(dir)
    }

    pub fn load_system_fonts(&mut self) {
        self.font_db.load_system_fonts();
    }

    /// Forgets a face and drops its decoded font, if any.
    pub fn remove_face(&mut self, id: fontdb::ID) {
        self.font_db.remove_face(id);
        self.decoded.remove(&id);
    }

    pub fn is_empty(&self) -> bool {
        self.font_db.is_empty()
    }

    pub fn len(&self) -> usize {
        self.font_db.len()
    }
}

/// Lookup
impl FontStorage {
    /// Finds the best face for `query` and decodes it.
    pub fn query(&mut self, query: &fontdb::Query) -> Option<(fontdb::ID, Arc<fontdue::Font>)> {
        let id = self.font_db.query(query)?;
        self.font(id).map(|font| (id, font))
    }

    /// Regular-weight upright face of the generic sans-serif family, falling
    /// back to whatever face was loaded first.
    pub fn default_face(&mut self) -> Option<(fontdb::ID, Arc<fontdue::Font>)> {
        const FAMILIES: &[fontdb::Family<'_>] = &[fontdb::Family::SansSerif];
        let query = fontdb::Query {
            families: FAMILIES,
            weight: fontdb::Weight::NORMAL,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        if let Some(found) = self.query(&query) {
            return Some(found);
        }

        let id = self.font_db.faces().next()?.id;
        self.font(id).map(|font| (id, font))
    }

    /// Returns the decoded font for `id`, decoding it on first use.
    pub fn font(&mut self, id: fontdb::ID) -> Option<Arc<fontdue::Font>> {
        use std::collections::hash_map::Entry;

        match self.decoded.entry(id) {
            Entry::Occupied(entry) => Some(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let decoded = self.font_db.with_face_data(id, |data, index| {
                    fontdue::Font::from_bytes(
                        data,
                        fontdue::FontSettings {
                            collection_index: index,
                            ..Default::default()
                        },
                    )
                })?;

                match decoded {
                    Ok(font) => Some(Arc::clone(entry.insert(Arc::new(font)))),
                    Err(e) => {
                        log::error!("Failed to decode font (id: {:?}): {}", id, e);
                        None
                    }
                }
            }
        }
    }

    pub fn faces(&self) -> impl Iterator<Item = &fontdb::FaceInfo> {
        self.font_db.faces()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_storage_is_empty() {
        let mut storage = FontStorage::new();
        assert!(storage.is_empty());
        assert_eq!(storage.len(), 0);
        assert!(storage.default_face().is_none());
    }

    #[test]
    fn test_unknown_face_is_not_decoded() {
        let mut storage = FontStorage::default();
        assert!(storage.font(fontdb::ID::dummy()).is_none());
    }

    #[test]
    fn test_garbage_binary_is_not_registered() {
        let mut storage = FontStorage::new();
        storage.load_font_binary(vec![0u8; 16]);
        assert!(storage.is_empty());
    }
}
