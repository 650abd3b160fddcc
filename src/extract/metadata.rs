use crate::{
    dom::{Dom, Node},
    selectors::AUTHOR_CANDIDATES,
    types::PostMetadata,
};

pub fn extract_post_metadata<D: Dom>(dom: &D) -> PostMetadata {
    let mut metadata = PostMetadata::default();

    for query in AUTHOR_CANDIDATES.iter() {
        let element = match dom.find_first(query) {
            Ok(Some(el)) => el,
            Ok(None) => continue,
            Err(e) => {
                warn!("error looking up author with {}: {}", query.selector(), e);
                continue;
            }
        };
        match element.inner_text() {
            // kept as rendered, unlike post content
            Ok(author) => {
                metadata.author = author;
                break;
            }
            Err(e) => {
                warn!("error reading author: {}", e);
            }
        }
    }

    metadata
}
