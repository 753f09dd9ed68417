fn main() {
    photo_studio::app::cli::run();
}
