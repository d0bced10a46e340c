fn main() {
    std::process::exit(event_timeline_lib::run());
}
