use crate::{
    dom::{Dom, Node},
    selectors::POST_MESSAGE,
};

/// The post body, or an empty string.
pub fn extract_post_content<D: Dom>(dom: &D) -> String {
    match read_message(dom) {
        Ok(content) => content,
        Err(e) => {
            debug!("no post content: {}", e);
            String::new()
        }
    }
}

fn read_message<D: Dom>(dom: &D) -> anyhow::Result<String> {
    let element = match dom.find_first(&POST_MESSAGE)? {
        Some(el) => el,
        None => return Ok(String::new()),
    };
    if !element.is_visible()? {
        return Ok(String::new());
    }
    Ok(element.inner_text()?.trim().to_string())
}
