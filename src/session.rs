//! The single active hashing scheme held by a control panel

use crate::{
    BitmapIndex, ExtendibleHashing, HashingError, HashingScheme, Key, LinearHashing, Scheme,
    SchemeConfig,
};
use log::info;

/// Holds exactly one active hashing scheme along with its tag and configuration.
///
/// Switching to another scheme discards the previous scheme's state.
#[derive(Debug)]
pub struct Session {
    /// Tag of the active scheme
    scheme: Scheme,
    /// Configuration the active scheme was built or last configured with
    config: SchemeConfig,
    /// The active scheme
    engine: Box<dyn HashingScheme>,
}

impl Session {
    /// Starts a session with a freshly built scheme.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(scheme: Scheme, config: SchemeConfig) -> Result<Self, HashingError> {
        let engine = scheme.build(&config)?;
        info!("session started with {scheme}");
        Ok(Self { scheme, config, engine })
    }

    /// Switches to another scheme. Selecting the active scheme keeps its state.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored configuration cannot build the new scheme.
    pub fn select(&mut self, scheme: Scheme) -> Result<(), HashingError> {
        if scheme == self.scheme {
            return Ok(());
        }

        self.engine = scheme.build(&self.config)?;
        info!("switched from {} to {scheme}", self.scheme);
        self.scheme = scheme;
        Ok(())
    }

    /// Applies a new configuration to the active scheme.
    ///
    /// A bitmap index whose size changes is rebuilt empty, since its size is fixed at
    /// construction.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation; the session is left unchanged.
    pub fn configure(&mut self, config: SchemeConfig) -> Result<(), HashingError> {
        config.validate()?;

        if self.scheme == Scheme::Bitmap && config.bitmap_size != self.config.bitmap_size {
            self.engine = Scheme::Bitmap.build(&config)?;
            info!("rebuilt bitmap index with {} bits", config.bitmap_size);
        } else {
            self.engine.configure(&config)?;
        }

        self.config = config;
        Ok(())
    }

    /// Inserts a key into the active scheme
    pub fn insert(&mut self, key: Key) {
        self.engine.insert(key);
    }

    /// Removes one occurrence of a key from the active scheme
    pub fn delete(&mut self, key: Key) -> bool {
        self.engine.delete(key)
    }

    /// Resets the active scheme to its freshly constructed state
    pub fn reset(&mut self) {
        self.engine.reset();
    }

    /// Tag of the active scheme
    #[must_use]
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Current configuration
    #[must_use]
    pub fn config(&self) -> &SchemeConfig {
        &self.config
    }

    /// The active scheme
    #[must_use]
    pub fn engine(&self) -> &dyn HashingScheme {
        &*self.engine
    }

    /// The active extendible hashing directory, if that is the selected scheme
    #[must_use]
    pub fn as_extendible(&self) -> Option<&ExtendibleHashing> {
        self.engine.as_any().downcast_ref()
    }

    /// The active linear hashing table, if that is the selected scheme
    #[must_use]
    pub fn as_linear(&self) -> Option<&LinearHashing> {
        self.engine.as_any().downcast_ref()
    }

    /// The active bitmap index, if that is the selected scheme
    #[must_use]
    pub fn as_bitmap(&self) -> Option<&BitmapIndex> {
        self.engine.as_any().downcast_ref()
    }

    /// Display text of the active scheme
    #[must_use]
    pub fn render(&self) -> String {
        self.engine.to_string()
    }

    /// One `After Inserting Key k: [..]` line per insertion into the active bitmap index.
    /// Empty for the other schemes.
    #[must_use]
    pub fn history_lines(&self) -> Vec<String> {
        self.as_bitmap().map_or_else(Vec::new, |index| index.history_lines().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = Session::new(Scheme::Extendible, SchemeConfig::default()).unwrap();
        assert_eq!(session.scheme(), Scheme::Extendible);
        assert_eq!(session.engine().scheme(), Scheme::Extendible);
        assert!(session.engine().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SchemeConfig::default().with_bitmap_size(0);
        assert_eq!(
            Session::new(Scheme::Bitmap, config).unwrap_err(),
            HashingError::InvalidBitmapSize { size: 0 }
        );
    }

    #[test]
    fn test_select_same_scheme_keeps_state() {
        let mut session = Session::new(Scheme::Linear, SchemeConfig::default()).unwrap();
        session.insert(4);
        session.select(Scheme::Linear).unwrap();

        assert!(session.engine().contains(4));
    }

    #[test]
    fn test_select_other_scheme_discards_state() {
        let mut session = Session::new(Scheme::Linear, SchemeConfig::default()).unwrap();
        session.insert(4);
        session.select(Scheme::Bitmap).unwrap();

        assert_eq!(session.scheme(), Scheme::Bitmap);
        assert!(session.engine().is_empty());
        assert_eq!(session.render(), "Bitmap: [0, 0, 0, 0, 0, 0, 0, 0]");

        session.select(Scheme::Linear).unwrap();
        assert!(!session.engine().contains(4));
    }

    #[test]
    fn test_configure_resizes_bitmap() {
        let mut session = Session::new(Scheme::Bitmap, SchemeConfig::default()).unwrap();
        session.insert(3);

        session.configure(SchemeConfig::default()).unwrap();
        assert!(session.engine().contains(3));

        session.configure(SchemeConfig::default().with_bitmap_size(4)).unwrap();
        assert!(session.engine().is_empty());
        assert_eq!(session.render(), "Bitmap: [0, 0, 0, 0]");
        assert_eq!(session.config().bitmap_size, 4);
    }

    #[test]
    fn test_configure_rejects_without_change() {
        let mut session = Session::new(Scheme::Linear, SchemeConfig::default()).unwrap();
        let err = session.configure(SchemeConfig::default().with_load_factor_threshold(2.0));

        assert!(err.is_err());
        assert!((session.config().load_factor_threshold - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bitmap_history_through_session() {
        let mut session = Session::new(Scheme::Bitmap, SchemeConfig::default()).unwrap();
        for key in [3, 5, 7] {
            session.insert(key);
        }

        assert_eq!(
            session.history_lines(),
            vec![
                "After Inserting Key 3: [0, 0, 0, 1, 0, 0, 0, 0]",
                "After Inserting Key 5: [0, 0, 0, 1, 0, 1, 0, 0]",
                "After Inserting Key 7: [0, 0, 0, 1, 0, 1, 0, 1]",
            ]
        );
        let bitmap = session.as_bitmap().unwrap();
        assert_eq!(bitmap.history().len(), 3);
        assert_eq!(bitmap.bitmap(), &[false, false, false, true, false, true, false, true]);
        assert!(session.as_extendible().is_none());
        assert!(session.as_linear().is_none());

        session.select(Scheme::Linear).unwrap();
        assert!(session.history_lines().is_empty());
        assert!(session.as_bitmap().is_none());
    }

    #[test]
    fn test_typed_access_follows_selection() {
        let mut session = Session::new(Scheme::Extendible, SchemeConfig::default()).unwrap();
        for key in [5, 7, 12, 14, 3] {
            session.insert(key);
        }

        let table = session.as_extendible().unwrap();
        assert_eq!(table.local_depths(), &[1, 2, 1, 2]);
        assert_eq!(table.buckets()[3], ("11".to_string(), &[7, 3][..]));

        session.select(Scheme::Linear).unwrap();
        session.insert(4);
        let table = session.as_linear().unwrap();
        assert_eq!(table.level(), 1);
        assert_eq!(table.buckets(), &[vec![4], vec![]]);
    }

    #[test]
    fn test_insert_delete_reset() {
        let mut session = Session::new(Scheme::Extendible, SchemeConfig::default()).unwrap();
        for key in [5, 7, 12] {
            session.insert(key);
        }

        assert!(session.delete(7));
        assert!(!session.delete(7));
        assert_eq!(session.engine().len(), 2);

        session.reset();
        assert!(session.engine().is_empty());
        assert_eq!(session.render(), "Bucket 0: []\nBucket 1: []\nLocal Depths: [1, 1]");
    }
}
