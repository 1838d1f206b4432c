/// Page header shown above the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

impl Default for Site {
    fn default() -> Self {
        Site {
            title: String::from("Time Empire"),
            subtitle: String::from("Stories, novels, and everything I’m building."),
            author: String::from("Darshan Goburdhone"),
        }
    }
}
