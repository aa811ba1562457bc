pub mod markup;
pub mod progress_bar;
pub mod song_list;
pub mod toast;
