fn main() {
    std::process::exit(taskrs::app::run());
}
