/// Looks up `name` in a `document.cookie` / `Cookie:` header style string.
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|entry| {
            let (key, value) = entry.split_once('=')?;
            if key == name {
                Some(value.to_string())
            } else {
                None
            }
        })
        .filter(|value| !value.is_empty())
}
