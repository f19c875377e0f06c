use crate::constants::ROOT_MESSAGE;

pub async fn root() -> &'static str {
    ROOT_MESSAGE
}
