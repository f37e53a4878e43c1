macro_rules! api_path {
    ($path:literal) => {
        concat!("/api", $path)
    };
}

/// Route definitions shared by the server and the integration tests.
///
/// The paths predate this service and are what the deployed frontend calls,
/// so they carry no version segment.
pub mod paths {
    pub const ROOT: &str = "/api";

    pub mod books {
        pub const LIST: &str = api_path!("/imagekit/rerngniten-data");
        pub const RECORD_VIEW: &str = api_path!("/imagekit/view-book");
    }

    pub mod audio {
        pub const LIST: &str = api_path!("/imagekit/audio-data");
        pub const TOGGLE_LIKE: &str = api_path!("/audio/{audio_id}/like");
    }

    pub mod videos {
        pub const COLLECTIONS: &str = api_path!("/videos/collections");
        pub const COMMENTS: &str = api_path!("/videos/{video_id}/comments");
    }

    pub mod comments {
        pub const REACT: &str = api_path!("/comments/{comment_id}/react");
    }

    /// Paths relative to [`ROOT`], used when nesting the router.
    pub mod relative {
        pub const BOOKS: &str = "/imagekit/rerngniten-data";
        pub const BOOK_VIEW: &str = "/imagekit/view-book";
        pub const AUDIO: &str = "/imagekit/audio-data";
        pub const AUDIO_LIKE: &str = "/audio/{audio_id}/like";
        pub const COLLECTIONS: &str = "/videos/collections";
        pub const VIDEO_COMMENTS: &str = "/videos/{video_id}/comments";
        pub const COMMENT_REACT: &str = "/comments/{comment_id}/react";
    }
}
