use std::any::type_name_of_val;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use futures::stream;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::domain::catalog::{
    AudioTrack, Book, CatalogListing, CategoryRules, FileDescriptor, FileKind,
    MatchedEntry, PageRequest, match_files,
};
use crate::error::{LibraryError, Result};
use crate::ports::{CounterStore, FileStore, ListFilesQuery, TextFetcher};

pub const DEFAULT_DESCRIPTION_CONCURRENCY: usize = 16;
/// Minimum spacing of re-listings triggered by ids the catalog has not shown.
pub const DEFAULT_UNKNOWN_ID_REFRESH: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Books,
    Audio,
}

impl CatalogKind {
    pub fn label(self) -> &'static str {
        match self {
            CatalogKind::Books => "book",
            CatalogKind::Audio => "audio item",
        }
    }
}

/// Where each catalog's files live and how entries are classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    pub books: ListFilesQuery,
    pub covers: ListFilesQuery,
    pub audio: ListFilesQuery,
    pub descriptions: ListFilesQuery,
    pub rules: CategoryRules,
    pub description_concurrency: usize,
    pub unknown_id_refresh: Duration,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            books: ListFilesQuery::new("/AllBook", FileKind::NonImage)
                .with_extensions(["pdf"]),
            covers: ListFilesQuery::new("/AllCover", FileKind::Image),
            audio: ListFilesQuery::new("/AllAudio", FileKind::NonImage)
                .with_extensions(["mp3", "ogg", "wav", "aac"]),
            descriptions: ListFilesQuery::new("/AllDescription", FileKind::NonImage)
                .with_extensions(["txt"]),
            rules: CategoryRules::default(),
            description_concurrency: DEFAULT_DESCRIPTION_CONCURRENCY,
            unknown_id_refresh: DEFAULT_UNKNOWN_ID_REFRESH,
        }
    }
}

#[derive(Debug, Default)]
struct KnownIds {
    ids: HashSet<String>,
    /// When an unknown id last forced a re-listing.
    refreshed_at: Option<Instant>,
}

/// Book and audio listings plus the counters attached to them.
///
/// Each listing remembers the ids it returned so that counter updates for
/// ids the catalog has never shown are rejected as not found.
pub struct CatalogService {
    settings: CatalogSettings,
    books: Option<Arc<dyn FileStore>>,
    audio: Option<Arc<dyn FileStore>>,
    text: Arc<dyn TextFetcher>,
    views: Arc<dyn CounterStore>,
    likes: Arc<dyn CounterStore>,
    known_books: RwLock<KnownIds>,
    known_audio: RwLock<KnownIds>,
}

impl fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogService")
            .field("settings", &self.settings)
            .field("books_configured", &self.books.is_some())
            .field("audio_configured", &self.audio.is_some())
            .field("views", &type_name_of_val(self.views.as_ref()))
            .field("likes", &type_name_of_val(self.likes.as_ref()))
            .finish_non_exhaustive()
    }
}

impl CatalogService {
    pub fn new(
        settings: CatalogSettings,
        books: Option<Arc<dyn FileStore>>,
        audio: Option<Arc<dyn FileStore>>,
        text: Arc<dyn TextFetcher>,
        views: Arc<dyn CounterStore>,
        likes: Arc<dyn CounterStore>,
    ) -> Self {
        Self {
            settings,
            books,
            audio,
            text,
            views,
            likes,
            known_books: RwLock::new(KnownIds::default()),
            known_audio: RwLock::new(KnownIds::default()),
        }
    }

    pub fn is_configured(&self, kind: CatalogKind) -> bool {
        match kind {
            CatalogKind::Books => self.books.is_some(),
            CatalogKind::Audio => self.audio.is_some(),
        }
    }

    fn store(&self, kind: CatalogKind) -> Result<&Arc<dyn FileStore>> {
        let store = match kind {
            CatalogKind::Books => self.books.as_ref(),
            CatalogKind::Audio => self.audio.as_ref(),
        };
        store.ok_or_else(|| {
            LibraryError::ConfigurationMissing(format!(
                "{} file store credentials are not configured",
                kind.label()
            ))
        })
    }

    fn primary_query(&self, kind: CatalogKind) -> &ListFilesQuery {
        match kind {
            CatalogKind::Books => &self.settings.books,
            CatalogKind::Audio => &self.settings.audio,
        }
    }

    fn known(&self, kind: CatalogKind) -> &RwLock<KnownIds> {
        match kind {
            CatalogKind::Books => &self.known_books,
            CatalogKind::Audio => &self.known_audio,
        }
    }

    fn remember<'a>(&self, kind: CatalogKind, ids: impl Iterator<Item = &'a str>) {
        let ids: HashSet<String> = ids.map(str::to_string).collect();
        self.known(kind).write().ids = ids;
    }

    fn is_known(&self, kind: CatalogKind, id: &str) -> bool {
        self.known(kind).read().ids.contains(id)
    }

    /// Reserve the next miss-driven re-listing. Fails while the previous one
    /// is younger than the configured interval.
    fn claim_refresh(&self, kind: CatalogKind) -> bool {
        let mut known = self.known(kind).write();
        let interval = self.settings.unknown_id_refresh;
        if known
            .refreshed_at
            .is_some_and(|last| last.elapsed() < interval)
        {
            return false;
        }
        known.refreshed_at = Some(Instant::now());
        true
    }

    /// Accept ids seen by the latest listing; on a miss, list the primary
    /// folder once more before giving up. Misses re-list at most once per
    /// refresh interval and otherwise answer from the cached ids.
    async fn ensure_known(&self, kind: CatalogKind, id: &str) -> Result<()> {
        if self.is_known(kind, id) {
            return Ok(());
        }
        if !self.claim_refresh(kind) {
            debug!(catalog = kind.label(), id, "unknown id, refresh throttled");
            return Err(LibraryError::NotFound(format!("{} {id}", kind.label())));
        }

        let store = self.store(kind)?;
        let files = store.list_files(self.primary_query(kind).clone()).await?;
        self.remember(kind, listed_ids(&files));

        if self.is_known(kind, id) {
            Ok(())
        } else {
            Err(LibraryError::NotFound(format!("{} {id}", kind.label())))
        }
    }

    async fn matched(&self, kind: CatalogKind) -> Result<Vec<MatchedEntry>> {
        let store = self.store(kind)?;
        let (primary_query, aux_query) = match kind {
            CatalogKind::Books => (&self.settings.books, &self.settings.covers),
            CatalogKind::Audio => (&self.settings.audio, &self.settings.descriptions),
        };

        let (primary, aux) = tokio::try_join!(
            store.list_files(primary_query.clone()),
            store.list_files(aux_query.clone()),
        )?;

        let entries = match_files(&primary, &aux, &self.settings.rules);
        self.remember(kind, entries.iter().map(|entry| entry.id.as_str()));
        debug!(
            catalog = kind.label(),
            primary = primary.len(),
            aux = aux.len(),
            matched = entries.len(),
            "matched catalog files"
        );
        Ok(entries)
    }

    pub async fn list_books(
        &self,
        request: &PageRequest,
    ) -> Result<CatalogListing<Book>> {
        let entries = self.matched(CatalogKind::Books).await?;
        let views = self.views.snapshot().await?;

        let mut books: Vec<Book> = entries
            .into_iter()
            .map(|entry| {
                let count = views.get(&entry.id).copied().unwrap_or(0);
                Book::from_entry(entry, count)
            })
            .collect();

        if let Some(category) = request
            .category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty())
        {
            books.retain(|book| book.category == category);
        }

        info!(count = books.len(), "listed books");
        Ok(CatalogListing::from_request(books, request))
    }

    pub async fn list_audio(
        &self,
        request: &PageRequest,
    ) -> Result<CatalogListing<AudioTrack>> {
        let entries = self.matched(CatalogKind::Audio).await?;
        let text = self.text.as_ref();

        let described: Vec<(MatchedEntry, String)> = stream::iter(entries)
            .map(|entry| async move {
                let description = match entry.aux.as_ref() {
                    Some(file) => fetch_description(text, file).await,
                    None => String::new(),
                };
                (entry, description)
            })
            .buffered(self.settings.description_concurrency.max(1))
            .collect()
            .await;

        let likes = self.likes.snapshot().await?;
        let tracks: Vec<AudioTrack> = described
            .into_iter()
            .map(|(entry, description)| {
                let count = likes.get(&entry.id).copied().unwrap_or(0);
                AudioTrack::from_entry(entry, Some(&description), count)
            })
            .collect();

        info!(count = tracks.len(), "listed audio");
        Ok(CatalogListing::from_request(tracks, request))
    }

    pub async fn record_view(&self, book_id: &str) -> Result<u64> {
        let book_id = book_id.trim();
        if book_id.is_empty() {
            return Err(LibraryError::Validation("Book ID is required".into()));
        }

        self.ensure_known(CatalogKind::Books, book_id).await?;
        let views = self.views.increment(book_id).await?;
        info!(book_id, views, "recorded book view");
        Ok(views)
    }

    /// `is_liked` is the caller's state before the toggle.
    pub async fn toggle_audio_like(
        &self,
        audio_id: &str,
        is_liked: Option<bool>,
    ) -> Result<u64> {
        let audio_id = audio_id.trim();
        let Some(was_liked) = is_liked else {
            return Err(LibraryError::Validation(
                "isLiked (boolean) is required".into(),
            ));
        };
        if audio_id.is_empty() {
            return Err(LibraryError::Validation("Audio ID is required".into()));
        }

        self.ensure_known(CatalogKind::Audio, audio_id).await?;
        let likes = self.likes.toggle(audio_id, was_liked).await?;
        info!(audio_id, was_liked, likes, "toggled audio like");
        Ok(likes)
    }
}

fn listed_ids(files: &[FileDescriptor]) -> impl Iterator<Item = &str> {
    files
        .iter()
        .filter(|file| !file.base_name().is_empty())
        .map(|file| file.file_id.as_str())
}

async fn fetch_description(text: &dyn TextFetcher, file: &FileDescriptor) -> String {
    match text.fetch_text(&file.url).await {
        Ok(body) => body,
        Err(err) => {
            warn!(file = %file.name, error = %err, "description fetch failed");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{CatalogPage, DESCRIPTION_FALLBACK};
    use crate::infra::memory::InMemoryCounterStore;
    use crate::ports::files::MockFileStore;
    use crate::ports::text::MockTextFetcher;

    fn file(id: &str, name: &str) -> FileDescriptor {
        FileDescriptor {
            file_id: id.into(),
            name: name.into(),
            file_path: format!("/x/{name}"),
            url: format!("https://cdn.example/{id}"),
            file_type: None,
        }
    }

    fn folder_store(folders: Vec<(&'static str, Vec<FileDescriptor>)>) -> MockFileStore {
        let mut store = MockFileStore::new();
        store.expect_list_files().returning(move |query| {
            Ok(folders
                .iter()
                .find(|(folder, _)| *folder == query.folder)
                .map(|(_, files)| files.clone())
                .unwrap_or_default())
        });
        store
    }

    fn no_text() -> MockTextFetcher {
        let mut text = MockTextFetcher::new();
        text.expect_fetch_text().never();
        text
    }

    fn books_service(
        store: MockFileStore,
        views: Arc<InMemoryCounterStore>,
    ) -> CatalogService {
        CatalogService::new(
            CatalogSettings::default(),
            Some(Arc::new(store)),
            None,
            Arc::new(no_text()),
            views,
            Arc::new(InMemoryCounterStore::new()),
        )
    }

    #[tokio::test]
    async fn books_get_covers_categories_and_views() {
        let store = folder_store(vec![
            ("/AllBook", vec![file("b1", "សៀវភៅ A.pdf"), file("b2", "Other.pdf")]),
            ("/AllCover", vec![file("c1", "សៀវភៅ a.JPG")]),
        ]);
        let views = Arc::new(InMemoryCounterStore::with_values([("b1", 7)]));
        let service = books_service(store, views);

        let CatalogListing::All(books) =
            service.list_books(&PageRequest::default()).await.unwrap()
        else {
            panic!("expected unpaginated listing");
        };

        assert_eq!(books.len(), 2);
        assert_eq!(books[0].category, "សៀវភៅទូទៅ");
        assert_eq!(books[0].cover_image_url.as_deref(), Some("https://cdn.example/c1"));
        assert_eq!(books[0].views, 7);
        assert_eq!(books[1].category, "ផ្សេងៗ");
        assert_eq!(books[1].cover_image_url, None);
        assert_eq!(books[1].views, 0);
    }

    #[tokio::test]
    async fn repeated_listing_is_stable() {
        let store = folder_store(vec![
            ("/AllBook", vec![file("b1", "x.pdf"), file("b2", "y.pdf")]),
            ("/AllCover", vec![]),
        ]);
        let service = books_service(store, Arc::new(InMemoryCounterStore::new()));
        let first = service.list_books(&PageRequest::default()).await.unwrap();
        let second = service.list_books(&PageRequest::default()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn category_filter_applies_before_paging() {
        let store = folder_store(vec![
            (
                "/AllBook",
                vec![
                    file("1", "រឿង one.pdf"),
                    file("2", "Misc.pdf"),
                    file("3", "រឿង two.pdf"),
                ],
            ),
            ("/AllCover", vec![]),
        ]);
        let service = books_service(store, Arc::new(InMemoryCounterStore::new()));
        let request = PageRequest {
            page: Some(1),
            limit: Some(1),
            category: Some("រឿងនិទាន".into()),
        };

        let CatalogListing::Page(CatalogPage { items, total_items, total_pages, .. }) =
            service.list_books(&request).await.unwrap()
        else {
            panic!("expected a page");
        };
        assert_eq!(total_items, 2);
        assert_eq!(total_pages, 2);
        assert_eq!(items[0].id, "1");
    }

    #[tokio::test]
    async fn view_on_unknown_book_is_not_found_after_refresh() {
        let mut store = MockFileStore::new();
        store
            .expect_list_files()
            .withf(|query| query.folder == "/AllBook")
            .times(2)
            .returning(|_| Ok(vec![file("b1", "Known.pdf")]));
        let service = CatalogService::new(
            CatalogSettings {
                unknown_id_refresh: Duration::ZERO,
                ..CatalogSettings::default()
            },
            Some(Arc::new(store)),
            None,
            Arc::new(no_text()),
            Arc::new(InMemoryCounterStore::new()),
            Arc::new(InMemoryCounterStore::new()),
        );

        assert_eq!(service.record_view("b1").await.unwrap(), 1);
        assert_eq!(service.record_view(" b1 ").await.unwrap(), 2);
        assert!(matches!(
            service.record_view("ghost").await,
            Err(LibraryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn unknown_ids_relist_once_per_interval() {
        let mut store = MockFileStore::new();
        store
            .expect_list_files()
            .withf(|query| query.folder == "/AllBook")
            .times(1)
            .returning(|_| Ok(vec![file("b1", "Known.pdf")]));
        let service = books_service(store, Arc::new(InMemoryCounterStore::new()));

        for ghost in ["ghost-1", "ghost-2", "ghost-3"] {
            assert!(matches!(
                service.record_view(ghost).await,
                Err(LibraryError::NotFound(_))
            ));
        }
        // The single re-listing still taught the service the real ids.
        assert_eq!(service.record_view("b1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn view_requires_an_id() {
        let service = books_service(MockFileStore::new(), Arc::new(InMemoryCounterStore::new()));
        assert!(matches!(
            service.record_view("  ").await,
            Err(LibraryError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn audio_store_missing_is_configuration_error() {
        let service = books_service(MockFileStore::new(), Arc::new(InMemoryCounterStore::new()));
        assert!(!service.is_configured(CatalogKind::Audio));
        assert!(matches!(
            service.list_audio(&PageRequest::default()).await,
            Err(LibraryError::ConfigurationMissing(_))
        ));
    }

    #[tokio::test]
    async fn audio_descriptions_degrade_to_fallback() {
        let store = folder_store(vec![
            (
                "/AllAudio",
                vec![file("a1", "Song.mp3"), file("a2", "Talk.mp3"), file("a3", "Bare.mp3")],
            ),
            (
                "/AllDescription",
                vec![file("d1", "song.txt"), file("d2", "Talk.txt")],
            ),
        ]);
        let mut text = MockTextFetcher::new();
        text.expect_fetch_text().returning(|url| {
            if url.ends_with("d1") {
                Ok("A song about rain".into())
            } else {
                Err(LibraryError::upstream("text fetch", "404 Not Found"))
            }
        });
        let likes = Arc::new(InMemoryCounterStore::with_values([("a2", 3)]));
        let service = CatalogService::new(
            CatalogSettings::default(),
            None,
            Some(Arc::new(store)),
            Arc::new(text),
            Arc::new(InMemoryCounterStore::new()),
            likes,
        );

        let CatalogListing::All(tracks) =
            service.list_audio(&PageRequest::default()).await.unwrap()
        else {
            panic!("expected unpaginated listing");
        };

        let ids: Vec<_> = tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a1", "a2", "a3"]);
        assert_eq!(tracks[0].description, "A song about rain");
        assert_eq!(tracks[1].description, DESCRIPTION_FALLBACK);
        assert_eq!(tracks[1].likes, 3);
        assert_eq!(tracks[2].description, DESCRIPTION_FALLBACK);
        assert_eq!(tracks[2].cover_image_url, None);
    }

    #[tokio::test]
    async fn audio_like_toggle_requires_state() {
        let store = folder_store(vec![("/AllAudio", vec![file("a1", "Song.mp3")])]);
        let service = CatalogService::new(
            CatalogSettings::default(),
            None,
            Some(Arc::new(store)),
            Arc::new(no_text()),
            Arc::new(InMemoryCounterStore::new()),
            Arc::new(InMemoryCounterStore::new()),
        );

        assert!(matches!(
            service.toggle_audio_like("a1", None).await,
            Err(LibraryError::Validation(_))
        ));
        assert_eq!(service.toggle_audio_like("a1", Some(false)).await.unwrap(), 1);
        assert_eq!(service.toggle_audio_like("a1", Some(true)).await.unwrap(), 0);
        assert_eq!(service.toggle_audio_like("a1", Some(true)).await.unwrap(), 0);
    }
}
