//! Browser-side bootstrap appended to served documents.

/// Opens an EventSource on `/livereload` and reloads on `message` events.
///
/// After a drop (server restart) the next successful open reloads as well.
pub const RELOAD_BOOTSTRAP: &str = r#"
<script>
  (() => {
    const source = new EventSource('/livereload');
    const reload = () => location.reload();
    source.onmessage = reload;
    source.onerror = () => (source.onopen = reload);
    console.log('[spa-devserver] listening for file changes');
  })();
</script>
"#;

/// The bootstrap when reload is on, otherwise nothing.
pub fn bootstrap(reload_enabled: bool) -> &'static str {
    if reload_enabled {
        RELOAD_BOOTSTRAP
    } else {
        ""
    }
}
