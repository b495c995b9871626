//! Test fixtures for archive items and pages.

use resource_query::{PageInfo, PageResult};
use server_core::domains::resources::{BlogPost, Project, Term, VideoItem, VideoOrigin};

pub fn term(slug: &str) -> Term {
    Term {
        name: slug.replace('-', " "),
        slug: slug.to_string(),
    }
}

pub fn blog_post(id: i64, title: &str) -> BlogPost {
    let slug = title.to_lowercase().replace(' ', "-");
    BlogPost {
        id,
        uri: format!("/blog/{}/", slug),
        slug,
        title: title.to_string(),
        date: "2024-04-01T09:00:00".to_string(),
        excerpt: Some("<p>Excerpt</p>".to_string()),
        featured_image: None,
        categories: vec![term("maintenance")],
    }
}

pub fn project(id: i64, title: &str, material: &str) -> Project {
    let slug = title.to_lowercase().replace(' ', "-");
    Project {
        id,
        uri: format!("/projects/{}/", slug),
        slug,
        title: title.to_string(),
        date: "2024-05-01T09:00:00".to_string(),
        featured_image: None,
        material_types: vec![term(material)],
        roof_colors: vec![],
        service_areas: vec![term("round-rock")],
    }
}

pub fn video(id: &str, title: &str) -> VideoItem {
    VideoItem {
        id: id.to_string(),
        origin: VideoOrigin::Video,
        title: title.to_string(),
        video_url: format!("https://www.youtube.com/watch?v={}", id),
        thumbnail_url: None,
        uri: format!("/videos/{}/", id),
        date: "2024-06-01T09:00:00".to_string(),
        categories: vec![],
    }
}

pub fn page<T>(items: Vec<T>, end_cursor: Option<&str>) -> PageResult<T> {
    let page_info = match end_cursor {
        Some(cursor) => PageInfo::next(cursor),
        None => PageInfo::last(),
    };
    PageResult::new(items, page_info)
}
