fn main() {
    gridcity::run();
}
