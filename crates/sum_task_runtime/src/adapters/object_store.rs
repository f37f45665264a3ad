pub trait ObjectStore {
    /// Writes `body` as the full object at `key`, replacing any existing object.
    fn write_object(
        &self,
        key: &str,
        body: &[u8],
        content_type: Option<&str>,
    ) -> Result<(), String>;
}

impl<T: ObjectStore + ?Sized> ObjectStore for &T {
    fn write_object(
        &self,
        key: &str,
        body: &[u8],
        content_type: Option<&str>,
    ) -> Result<(), String> {
        (**self).write_object(key, body, content_type)
    }
}
